use cover_engine::*;

#[test]
fn test_paper_calipers() {
    assert_eq!(PaperType::Offset80.caliper_mm(), 0.055);
    assert_eq!(PaperType::ArtMatt135.caliper_mm(), 0.058);
    assert_eq!(PaperType::Volume90.caliper_mm(), 0.0783);
    assert!(PaperType::ALL.iter().all(|p| p.caliper_mm() > 0.0));
}

#[test]
fn test_paper_keys_round_trip() {
    for paper in PaperType::ALL {
        assert_eq!(PaperType::from_key(paper.key()), Some(paper));
        assert!(!paper.label().is_empty());
    }
    assert_eq!(PaperType::from_key("90g_bogus"), None);
}

#[test]
fn test_named_format_dimensions() {
    assert_eq!(TrimFormat::A4.named_dimensions_mm(), Some((210.0, 297.0)));
    assert_eq!(TrimFormat::A5Landscape.named_dimensions_mm(), Some((210.0, 148.0)));
    assert_eq!(TrimFormat::F15_5x22.named_dimensions_mm(), Some((155.0, 220.0)));
    assert_eq!(TrimFormat::custom(1.0, 2.0).named_dimensions_mm(), None);
}

#[test]
fn test_price_multipliers() {
    assert_eq!(TrimFormat::A4.price_multiplier(), 1.2);
    assert_eq!(TrimFormat::A5.price_multiplier(), 1.0);
    assert_eq!(TrimFormat::A6.price_multiplier(), 0.8);
    assert_eq!(TrimFormat::F21x28.price_multiplier(), 1.15);
    assert_eq!(TrimFormat::custom(100.0, 100.0).price_multiplier(), 1.3);
}

#[test]
fn test_orientation() {
    assert_eq!(Orientation::for_size(460.8, 323.0), Orientation::Landscape);
    assert_eq!(Orientation::for_size(100.0, 100.0), Orientation::Portrait);
    assert_eq!(Orientation::for_size(90.0, 120.0), Orientation::Portrait);
}

#[test]
fn test_panel_order_and_names() {
    assert_eq!(
        PanelKind::ALL,
        [PanelKind::Back, PanelKind::Spine, PanelKind::Front]
    );
    assert_eq!(PanelKind::Spine.to_string(), "spine");
    assert_eq!(COMBINED_PDF_PAGE_ORDER, PanelKind::ALL);
}

#[test]
fn test_rgb_hex() {
    assert_eq!(Rgb::from_hex("#2563eb").unwrap(), Rgb::new(0x25, 0x63, 0xeb));
    assert_eq!(Rgb::from_hex("fff").unwrap(), Rgb::WHITE);
    assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    assert!(matches!(Rgb::from_hex("#12345"), Err(CoverError::Config(_))));
    assert!(matches!(Rgb::from_hex("#zzzzzz"), Err(CoverError::Config(_))));
}

#[test]
fn test_rgb_hex_rejects_multibyte_digits() {
    // Six bytes, but 'é' straddles the channel boundaries
    assert!(matches!(Rgb::from_hex("#aébé"), Err(CoverError::Config(_))));
    assert!(matches!(Rgb::from_hex("ééé"), Err(CoverError::Config(_))));
    assert!(Rgb::try_from("#ab€".to_string()).is_err());
}

#[test]
fn test_error_panel_context() {
    let err = CoverError::PageIndexOutOfRange {
        panel: PanelKind::Front,
        requested: 3,
        page_count: 2,
    };
    assert_eq!(err.panel(), Some(PanelKind::Front));
    let message = err.to_string();
    assert!(message.contains("front"));
    assert!(message.contains("2 page(s)"));

    let err = CoverError::CanvasContextUnavailable {
        width: 0,
        height: 0,
    };
    assert_eq!(err.panel(), None);
}

#[test]
fn test_binding_names() {
    assert_eq!(BindingType::default(), BindingType::Hardcover);
    assert!(BindingType::Hardcover.is_hardcover());
    assert!(!BindingType::Softcover.is_hardcover());
    assert_eq!(BindingType::Softcover.name(), "softcover");
}
