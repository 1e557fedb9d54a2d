use cover_engine::*;

#[test]
fn test_default_specification() {
    let spec = BookSpecification::default();
    assert_eq!(spec.binding, BindingType::Hardcover);
    assert_eq!(spec.format, TrimFormat::A5);
    assert_eq!(spec.scale_front, 1.0);
    assert_eq!(spec.scale_back, 1.0);
    assert!(spec.validate().is_empty());
}

#[test]
fn test_validate_reports_out_of_range_values() {
    let spec = BookSpecification {
        page_count: 900,
        scale_front: 1.5,
        scale_back: 0.9,
        format: TrimFormat::Custom {
            width_mm: Some(-10.0),
            height_mm: Some(200.0),
        },
        ..Default::default()
    };
    let findings = spec.validate();

    assert_eq!(findings.len(), 4);
    assert!(findings[0].contains("900"));
    assert!(findings.iter().any(|f| f.starts_with("front scale")));
    assert!(findings.iter().any(|f| f.starts_with("back scale")));
    assert!(findings.iter().any(|f| f.contains("Custom width")));
}

#[test]
fn test_boundary_values_are_valid() {
    for (page_count, scale) in [(20, 1.0), (800, 1.2)] {
        let spec = BookSpecification {
            page_count,
            scale_front: scale,
            scale_back: scale,
            ..Default::default()
        };
        assert!(spec.validate().is_empty(), "{:?}", spec.validate());
    }
}

#[test]
fn test_default_style() {
    let style = CoverStyle::default();
    assert_eq!(style.background, Rgb::WHITE);
    assert_eq!(style.guide_color.to_hex(), "#2563eb");
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_save_and_load_specification() {
        let spec = BookSpecification {
            binding: BindingType::Softcover,
            format: TrimFormat::custom(160.0, 230.0),
            paper: PaperType::ArtGloss170,
            page_count: 256,
            scale_front: 1.1,
            scale_back: 1.0,
        };

        let temp = NamedTempFile::new().unwrap();
        spec.save(temp.path()).await.unwrap();
        let loaded = BookSpecification::load(temp.path()).await.unwrap();

        assert_eq!(loaded, spec);
    }

    #[tokio::test]
    async fn test_load_uses_stable_keys_and_defaults() {
        let temp = NamedTempFile::new().unwrap();
        tokio::fs::write(
            temp.path(),
            r#"{ "binding": "softcover", "format": "17x24", "paper": "135g_art_matt" }"#,
        )
        .await
        .unwrap();

        let spec = BookSpecification::load(temp.path()).await.unwrap();
        assert_eq!(spec.binding, BindingType::Softcover);
        assert_eq!(spec.format, TrimFormat::F17x24);
        assert_eq!(spec.paper, PaperType::ArtMatt135);
        assert_eq!(spec.page_count, 100);
    }

    #[tokio::test]
    async fn test_load_custom_format_with_missing_height() {
        let temp = NamedTempFile::new().unwrap();
        tokio::fs::write(
            temp.path(),
            r#"{ "format": { "custom": { "width_mm": 150.0 } } }"#,
        )
        .await
        .unwrap();

        let spec = BookSpecification::load(temp.path()).await.unwrap();
        let trim = spec.format.trim_size();
        assert_eq!(trim.width_mm, 150.0);
        assert_eq!(trim.height_mm, 297.0);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_json() {
        let temp = NamedTempFile::new().unwrap();
        tokio::fs::write(temp.path(), "{ not json").await.unwrap();

        let result = BookSpecification::load(temp.path()).await;
        assert!(matches!(result, Err(CoverError::Config(_))));
    }

    #[test]
    fn test_style_colours_serialize_as_hex() {
        let style = CoverStyle {
            background: Rgb::new(0x10, 0x20, 0x30),
            ..Default::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"#102030\""));

        let back: CoverStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
