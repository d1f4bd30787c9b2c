use laserplot_core::units::{parse_unit_token, precision_for_tolerance};
use laserplot_core::{PaperSize, Units};

#[test]
fn test_tolerance_drives_precision() {
    assert_eq!(precision_for_tolerance(0.01), 2);
    assert_eq!(precision_for_tolerance(0.0001), 4);
}

#[test]
fn test_unknown_unit_is_error() {
    let err = parse_unit_token("parsec").unwrap_err();
    assert_eq!(err.to_string(), "Unknown unit: parsec");
}

#[test]
fn test_every_paper_size_is_portrait() {
    for paper in PaperSize::ALL {
        let (w, h) = paper.size_mm();
        assert!(h > w, "{} should be taller than wide", paper);
    }
}

#[test]
fn test_units_roundtrip_display() {
    for units in [Units::MM, Units::INCH] {
        let parsed: Units = units.to_string().parse().unwrap();
        assert_eq!(parsed, units);
    }
}
