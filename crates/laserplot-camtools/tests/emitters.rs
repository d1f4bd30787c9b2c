use laserplot_camtools::{
    CommandInterface, Compiler, CompilerParameters, CutParameters, InterfaceOptions,
    LineSegmentChain, LineSegmentEmitter, PathSampler, PixelGrid, RasterParameters,
    RasterScanEmitter, SvgDocument,
};
use laserplot_core::{DialectKind, Position};

fn chain(points: &[(f64, f64)]) -> LineSegmentChain {
    let points: Vec<Position> = points.iter().copied().map(Position::from).collect();
    LineSegmentChain::from_points(&points)
}

#[test]
fn test_single_segment_from_unknown_position() {
    let mut iface = CommandInterface::default();
    let emitter = LineSegmentEmitter::new(CutParameters {
        movement_speed: 90.0,
        cutting_speed: 90.0,
        laser_power: 1.0,
        dwell_time: 0,
    });
    let mut body = Vec::new();

    emitter
        .emit(&mut iface, &chain(&[(0.0, 0.0), (10.0, 0.0)]), &mut body)
        .unwrap();

    assert_eq!(
        body,
        vec![
            "M4 0.0",
            "",
            "G0 X0.00 Y0.00",
            "",
            "M4 100.0",
            "G1 X10.00 Y0.00"
        ]
    );
    assert_eq!(iface.position(), Some(Position::new(10.0, 0.0)));
}

#[test]
fn test_contiguous_chain_continues_cut() {
    let mut iface = CommandInterface::default();
    let emitter = LineSegmentEmitter::default();
    let mut body = Vec::new();

    emitter
        .emit(&mut iface, &chain(&[(0.0, 0.0), (10.0, 0.0)]), &mut body)
        .unwrap();
    let first_len = body.len();

    emitter
        .emit(&mut iface, &chain(&[(10.0, 0.0), (10.0, 10.0)]), &mut body)
        .unwrap();
    assert_eq!(&body[first_len..], ["G1 X10.00 Y10.00"]);
}

#[test]
fn test_distant_chain_repeats_setup() {
    let mut iface = CommandInterface::default();
    let emitter = LineSegmentEmitter::default();
    let mut body = Vec::new();

    emitter
        .emit(&mut iface, &chain(&[(0.0, 0.0), (10.0, 0.0)]), &mut body)
        .unwrap();
    let first_len = body.len();

    emitter
        .emit(&mut iface, &chain(&[(10.02, 0.0), (20.0, 0.0)]), &mut body)
        .unwrap();
    assert_eq!(
        &body[first_len..],
        ["M4 0.0", "", "G0 X10.02 Y0.00", "", "M4 100.0", "G1 X20.00 Y0.00"]
    );
}

#[test]
fn test_two_by_two_raster_zigzag() {
    let mut iface = CommandInterface::default();
    let grid = PixelGrid::from_rows(&[[0u8, 255], [255, 0]]).unwrap();
    let emitter = RasterScanEmitter::new(RasterParameters {
        resolution: 1.0,
        ..Default::default()
    });
    let mut body = Vec::new();

    emitter.emit(&mut iface, &grid, &mut body).unwrap();

    assert_eq!(
        body,
        vec![
            "; Row 1",
            "G1 X0.00 Y0.00",
            "M4 100.0",
            "G1 X1.00 Y0.00",
            "M4 0.0",
            "M4 0.0",
            "; Row 2",
            "G1 X1.00 Y1.00",
            "M4 100.0",
            "G1 X0.00 Y1.00",
            "M4 0.0",
            "M4 0.0",
            "M4 0.0",
            "G28",
        ]
    );
}

#[test]
fn test_grbl_raster_uses_native_scale() {
    let mut iface = CommandInterface::for_kind(DialectKind::Grbl, InterfaceOptions::default());
    let grid = PixelGrid::from_rows(&[[0u8]]).unwrap();
    let mut body = Vec::new();
    RasterScanEmitter::default()
        .emit(&mut iface, &grid, &mut body)
        .unwrap();
    assert_eq!(
        body,
        vec!["; Row 1", "G1 X0.00 Y0.00", "M4 S1000", "M4 S0", "M4 S0", "$H"]
    );
}

#[test]
fn test_multi_pass_program_layout() {
    let mut compiler = Compiler::new(
        CommandInterface::default(),
        CompilerParameters {
            unit: Some("mm".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    compiler
        .append_chain(&chain(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]))
        .unwrap();

    let body: Vec<String> = compiler
        .body()
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect();
    let program = compiler.compile(3).unwrap();
    let lines = program.lines();

    let header = ["G21", "G90", "M4 0.0"];
    assert_eq!(&lines[..header.len()], header);
    for pass in 0..3 {
        let start = header.len() + pass * body.len();
        assert_eq!(&lines[start..start + body.len()], body.as_slice());
    }
    assert_eq!(lines.last().map(String::as_str), Some("M4 0.0"));
    assert_eq!(lines.len(), header.len() + 3 * body.len() + 1);
}

#[test]
fn test_svg_to_program_file() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <path d="M 10 10 L 20 10 L 20 20" />
        <path d="M 20 20 L 30 20" power="0.5" />
    </svg>"#;
    let doc = SvgDocument::parse(svg).unwrap();
    let sampler = PathSampler::new(1.0, 100.0).unwrap();

    let mut compiler = Compiler::new(CommandInterface::default(), CompilerParameters::default())
        .unwrap();
    for curve in doc.curves() {
        compiler.append_curve(curve, &sampler).unwrap();
    }
    let program = compiler.compile(1).unwrap();

    // Second path starts where the first ends, so no second rapid move
    let rapids = program
        .lines()
        .iter()
        .filter(|l| l.starts_with("G0"))
        .count();
    assert_eq!(rapids, 1);
    assert!(program.lines().contains(&"G0 X10.00 Y90.00".to_string()));
    assert!(program.lines().contains(&"G1 X30.00 Y80.00".to_string()));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gcode");
    std::fs::write(&path, program.to_string()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), program.len());
    assert!(written.ends_with('\n'));
}

#[test]
fn test_sampled_paths_honour_power_and_passes() {
    let svg = r#"<path d="M0 0 L2 0" power="0.3" passes="2"/>"#;
    let doc = SvgDocument::parse(svg).unwrap();
    let sampler = PathSampler::new(1.0, 0.0).unwrap();

    let mut compiler = Compiler::new(CommandInterface::default(), CompilerParameters::default())
        .unwrap();
    for path in doc.sampled_paths(&sampler).unwrap() {
        compiler.append_sampled_path(&path).unwrap();
    }
    let body = compiler.body();
    assert_eq!(body[0], "G0 X0.00 Y0.00");
    assert_eq!(body[1], "M4 30.0");
    let cuts = body.iter().filter(|l| l.starts_with("G1")).count();
    assert_eq!(cuts, 6);
    assert_eq!(body.last().map(String::as_str), Some("M4 0.0"));
}
