use letter_flow::blocks::*;
use letter_flow::layout::Margins;
use letter_flow::pagesize::{A4, A5};
use letter_flow::{colours, render, render_to_file, Info, Mm, PDFError};
use std::sync::Arc;

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-"), "missing header");
    let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]);
    assert!(tail.contains("%%EOF"), "missing trailer: {tail}");
}

/// The number of page objects in a PDF, which are written uncompressed
fn page_count(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page";
    bytes
        .windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

fn invoice_rows() -> Vec<Vec<String>> {
    [
        ["Description", "Qty", "Amount"],
        ["Consulting", "3", "£1,200.00"],
        ["Travel", "1", "£84.50"],
        ["Printing", "250", "£15.25"],
    ]
    .iter()
    .map(|row| row.iter().map(|s| s.to_string()).collect())
    .collect()
}

fn letter_template() -> Template {
    let mut info = Info::new();
    info.title("Invoice 42").author("ACME Ltd");

    let mut template = Template::new();
    template
        .page_size(A4)
        .margins(Margins::all(Mm(15.0)))
        .default_font(FontSpec::new(FontFamily::Times, 11.0))
        .header(
            vec![TextBlock {
                font: Some(FontSpec::new(FontFamily::Helvetica, 16.0).bold()),
                alignment: Align::Right,
                ..TextBlock::new("ACME Ltd")
            }
            .into()],
            PagePlacement::All,
        )
        .footer(
            vec![TextBlock::new("Registered in England No. 0000000").into()],
            PagePlacement::Last,
        )
        .page_numbers(PageNumberPosition::Bottom, Align::Center)
        .info(info);
    template
}

#[test]
fn renders_a_complete_letter() {
    let template = letter_template();
    let logo = Arc::new(image::DynamicImage::new_rgba8(64, 32));

    let mut logo_block = ImageBlock::new(ImageSource::Bitmap(logo), (Mm(40.0), Mm(20.0)));
    logo_block.alignment = Align::Right;
    logo_block.wrap_text = true;

    let mut table = TableBlock::new(invoice_rows());
    table.alignment = vec![Align::Left, Align::Center, Align::Right];
    table.striped_colour = Some(colours::LIGHT_GREY);
    table.heading_colour = colours::BLUE;
    table.heading_text_colour = colours::WHITE;
    table.column_widths = Some(vec![0.6, 0.1, 0.3]);
    table.add_total = true;

    let mut qr = QrBlock::new("https://example.com/pay/42");
    qr.size = Mm(30.0);
    qr.alignment = Align::Left;
    qr.wrap_text = true;

    let blocks: Vec<ContentBlock> = vec![
        logo_block.into(),
        TextBlock::new("1 High Street\nLondon\nN1 1AA").into(),
        LineBreakBlock::default().into(),
        TextBlock {
            alignment: Align::Justify,
            ignore_wrap: true,
            ..TextBlock::new(lipsum::lipsum(120))
        }
        .into(),
        LineBlock {
            padding: Mm(2.0),
            ..Default::default()
        }
        .into(),
        table.into(),
        qr.into(),
        TextBlock {
            font: Some(FontSpec {
                style: FontStyle {
                    underline: true,
                    ..FontStyle::NONE
                },
                ..FontSpec::new(FontFamily::Courier, 10.0)
            }),
            fill: Some(colours::LIGHT_GREY),
            border: Border::ALL,
            ..TextBlock::new("Scan the code to pay online.")
        }
        .into(),
        ContentBlock::positioned(
            BlockKind::Box(BoxBlock::new(Mm(60.0), Mm(25.0), BoxStyle::BorderBackground)),
            FixedPosition::at(Mm(0.0), Mm(30.0)).on_pages(PagePlacement::First),
        ),
        ContentBlock::positioned(
            BlockKind::Text(TextBlock::new("PAID")),
            FixedPosition::at(Mm(150.0), Mm(250.0))
                .without_margin()
                .on_pages(PagePlacement::Last),
        ),
    ];

    let bytes = render(&template, &blocks).expect("renders");
    assert_valid_pdf(&bytes);
    assert!(page_count(&bytes) >= 1);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Times-Roman"));
    assert!(text.contains("/Helvetica-Bold"));
    assert!(text.contains("/Courier"));
}

#[test]
fn long_letters_run_onto_more_pages() {
    let mut template = Template::new();
    template.page_size(A5);
    let blocks: Vec<ContentBlock> = (0..12)
        .map(|_| TextBlock::new(lipsum::lipsum(150)).into())
        .collect();

    let bytes = render(&template, &blocks).expect("renders");
    assert_valid_pdf(&bytes);
    assert!(page_count(&bytes) > 1);
}

#[test]
fn background_images_are_shared_between_pages() {
    let mut template = Template::new();
    template.background_image(ImageSource::Bitmap(Arc::new(image::DynamicImage::new_luma8(
        8, 8,
    ))));
    let blocks: Vec<ContentBlock> = (0..10)
        .map(|_| TextBlock::new(lipsum::lipsum(200)).into())
        .collect();

    let bytes = render(&template, &blocks).expect("renders");
    assert!(page_count(&bytes) > 1);
    let images = String::from_utf8_lossy(&bytes)
        .matches("/Subtype /Image")
        .count();
    assert_eq!(images, 1);
}

#[test]
fn bad_column_widths_are_reported() {
    let mut table = TableBlock::new(invoice_rows());
    table.column_widths = Some(vec![0.5, 0.5]);
    let result = render(&Template::new(), &[table.into()]);
    assert!(matches!(
        result,
        Err(PDFError::ColumnCountMismatch {
            columns: 3,
            widths: 2
        })
    ));
}

#[test]
fn missing_image_files_are_io_errors() {
    let block = ImageBlock::new(
        ImageSource::Path("/no/such/logo.png".into()),
        (Mm(10.0), Mm(10.0)),
    );
    let result = render(&Template::new(), &[block.into()]);
    assert!(matches!(result, Err(PDFError::Io(_))));
}

#[test]
fn writes_to_a_file() {
    let path = std::env::temp_dir().join(format!("letter-flow-{}.pdf", std::process::id()));
    let blocks: Vec<ContentBlock> = vec![TextBlock::new("Dear Sir or Madam,").into()];
    render_to_file(&Template::new(), &blocks, &path).expect("writes");
    let bytes = std::fs::read(&path).expect("file exists");
    std::fs::remove_file(&path).ok();
    assert_valid_pdf(&bytes);
}
