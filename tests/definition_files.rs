//! Whole definitions parsed against the reference circuit.

use std::fs;

use expect_test::expect;
use logsim::dsl::{self, Diagnostic, ErrorKind, SemanticError, SyntaxError, WriterSink};
use logsim::error::{ConnectionError, DeviceError, MonitorError};
use logsim::{Circuit, LogsimError, SymbolTable};

struct Outcome {
    ok: bool,
    diagnostics: Vec<Diagnostic>,
    circuit: Circuit,
    names: SymbolTable,
}

impl Outcome {
    fn kinds(&self) -> Vec<ErrorKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }

    fn position(&self, index: usize) -> (usize, usize) {
        let location = self.diagnostics[index]
            .location
            .as_ref()
            .expect("diagnostic should have a location");
        (location.line, location.column)
    }
}

fn check(source: &str) -> Outcome {
    let mut names = SymbolTable::new();
    let mut circuit = Circuit::new(&mut names);
    let mut diagnostics = Vec::new();
    let ok = dsl::parse(source, &mut names, &mut circuit, &mut diagnostics);
    Outcome {
        ok,
        diagnostics,
        circuit,
        names,
    }
}

fn syntax(kind: SyntaxError) -> ErrorKind {
    ErrorKind::Syntax(kind)
}

const FLIP_FLOP: &str = r"\\ Clocked flip-flop with a toggling data line
DEVICES:
    CLOCK clk 2,
    SWITCH rst 0, SWITCH set 0,
    RC pulse 3,
    DTYPE ff1;
\* Every DTYPE input must be driven,
   otherwise the network is incomplete. *\
CONNECTIONS:
    clk -> ff1.CLK,
    set -> ff1.SET,
    pulse -> ff1.CLEAR,
    ff1.QBAR -> ff1.DATA;
MONITOR:
    ff1.Q, clk;
";

#[test]
fn test_valid_definition_builds_circuit() {
    let outcome = check(FLIP_FLOP);
    assert!(outcome.ok, "{:?}", outcome.diagnostics);
    assert!(outcome.diagnostics.is_empty());

    let circuit = &outcome.circuit;
    assert_eq!(circuit.devices().len(), 5);
    assert_eq!(circuit.connections().count(), 4);

    let monitors: Vec<_> = circuit
        .monitors()
        .iter()
        .map(|&port| circuit.port_label(&outcome.names, port).unwrap())
        .collect();
    assert_eq!(monitors, ["ff1.Q", "clk"]);
}

#[test]
fn test_whitespace_and_comments_only() {
    for source in ["", "   \n\t\n", "\\\\ nothing\n", "\\* a\nb\nc *\\\n"] {
        let outcome = check(source);
        assert!(!outcome.ok);
        assert_eq!(outcome.kinds(), vec![syntax(SyntaxError::PrematureEof)]);
    }
}

#[test]
fn test_missing_comma_recovers_next_device() {
    let outcome = check("DEVICES: SWITCH s1 0 SWITCH s2 0; CONNECTIONS: ;");
    assert!(!outcome.ok);

    let missing: Vec<_> = outcome
        .diagnostics
        .iter()
        .enumerate()
        .filter(|(_, d)| d.kind == syntax(SyntaxError::MissingDelimiter))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(outcome.position(missing[0]), (1, 22));
    assert_eq!(outcome.circuit.devices().len(), 2);
}

#[test]
fn test_truncated_definition() {
    let outcome = check("DEVICES: SWITCH s1 0,");
    assert!(!outcome.ok);
    assert_eq!(outcome.kinds(), vec![syntax(SyntaxError::PrematureEof)]);
    assert_eq!(outcome.diagnostics[0].to_string(), "Error: file ended abruptly");
}

#[test]
fn test_truncated_inside_connection() {
    let outcome = check("DEVICES: SWITCH s1 0, XOR x1; CONNECTIONS: s1 -> x1.");
    assert_eq!(outcome.kinds(), vec![syntax(SyntaxError::PrematureEof)]);
}

#[test]
fn test_block_comment_keeps_positions() {
    let source = "DEVICES: SWITCH s1 0,\n\\* a\nb\nc *\\\n  SWITCH s2 0 SWITCH s3 1;\nCONNECTIONS: s1 -> s1;";
    let outcome = check(source);
    assert_eq!(outcome.kinds()[0], syntax(SyntaxError::MissingDelimiter));
    assert_eq!(outcome.position(0), (5, 15));
}

#[test]
fn test_incomplete_network() {
    let outcome = check("DEVICES: SWITCH s1 0, AND a1 2; CONNECTIONS: s1 -> a1.I1; MONITOR: a1;");
    assert!(!outcome.ok);
    assert_eq!(
        outcome.kinds(),
        vec![ErrorKind::Semantic(SemanticError::NotAllInputsConnected)]
    );
    assert_eq!(
        outcome.diagnostics[0].to_string(),
        "Error: not all inputs in the network are connected"
    );
    // The monitor section is still read.
    assert_eq!(outcome.circuit.monitors().len(), 1);
}

#[test]
fn test_builder_errors_are_reported_in_order() {
    let source = "\
DEVICES:
    SWITCH s1 0,
    SWITCH s1 1,
    XOR x1 2,
    SWITCH s2 2,
    CLOCK c1,
    XOR x2,
    DTYPE d1;
CONNECTIONS:
    s1 -> x2.I1,
    s1 -> x2.I1,
    c1 -> x2.I2,
    x2 -> s1,
    d1 -> x2.I2,
    x2.I1 -> d1.DATA;
MONITOR:
    x2, x2, d1.DATA, d1, ghost;
";
    let outcome = check(source);
    assert!(!outcome.ok);

    let expected: Vec<ErrorKind> = vec![
        DeviceError::DeviceAlreadyExists.into(),
        DeviceError::QualifierNotAllowed.into(),
        DeviceError::InvalidQualifier.into(),
        DeviceError::QualifierRequired.into(),
        ConnectionError::InputAlreadyConnected.into(),
        ConnectionError::DeviceNotDefined.into(),
        ConnectionError::OutputToOutput.into(),
        ConnectionError::PortNotFound.into(),
        SemanticError::InvalidOutput.into(),
        SemanticError::NotAllInputsConnected.into(),
        MonitorError::AlreadyMonitored.into(),
        SemanticError::InvalidOutput.into(),
        MonitorError::PortNotAnOutput.into(),
        MonitorError::DeviceNotDefined.into(),
    ];
    assert_eq!(outcome.kinds(), expected);

    // Relayed errors point at the last token of the item.
    assert_eq!(outcome.position(0), (3, 15));
    assert_eq!(outcome.diagnostics[9].location, None);

    assert_eq!(outcome.circuit.devices().len(), 3);
    assert_eq!(outcome.circuit.connections().count(), 1);
    assert_eq!(outcome.circuit.monitors().len(), 1);
}

#[test]
fn test_port_checks_use_declared_ports() {
    let outcome = check("DEVICES: DTYPE d1; CONNECTIONS: d1.Q -> d1.DSF, d1.Q -> d1.DATA;");
    let expected: Vec<ErrorKind> = vec![
        SemanticError::InvalidInput.into(),
        SemanticError::NotAllInputsConnected.into(),
    ];
    assert_eq!(outcome.kinds(), expected);
    assert_eq!(outcome.position(0), (1, 44));
}

#[test]
fn test_invalid_input_rendering() {
    let outcome = check("DEVICES: SWITCH s1 0, SWITCH s2 0;\nCONNECTIONS: s1 -> s2.I1;\n");
    expect![[r#"
        Error on line 2: port is not an input of this device
        CONNECTIONS: s1 -> s2.I1;
                              ^"#]]
    .assert_eq(&outcome.diagnostics[0].to_string());
}

#[test]
fn test_comma_before_section_rendering() {
    let outcome = check("DEVICES:\n\tSWITCH s1 0,\nCONNECTIONS: s1 -> s1;\n");
    assert_eq!(outcome.kinds()[0], syntax(SyntaxError::CommaNotSemicolon));
    assert_eq!(
        outcome.diagnostics[0].to_string(),
        "Error on line 2: found a comma instead of a semicolon at the end of the list\n\tSWITCH s1 0,\n\t           ^"
    );
}

#[test]
fn test_stray_semicolon_keeps_later_sections() {
    let outcome = check(
        "DEVICES: SWITCH s1 0, XOR x1;;\nCONNECTIONS: s1 -> x1.I1, s1 -> x1.I2;\nMONITOR: x1;",
    );
    assert!(!outcome.ok);
    assert_eq!(
        outcome.kinds(),
        vec![syntax(SyntaxError::MissingConnectionsKeyword)]
    );
    assert_eq!(outcome.circuit.connections().count(), 2);
    assert_eq!(outcome.circuit.monitors().len(), 1);
}

#[test]
fn test_section_errors() {
    let cases = [
        (
            "CONNECTIONS: s1 -> s1;",
            syntax(SyntaxError::MissingDeviceKeyword),
        ),
        (
            "DEVICES SWITCH s1 0; CONNECTIONS: s1 -> s1;",
            syntax(SyntaxError::MissingColon),
        ),
        (
            "DEVICES: SWITCH s1 0; MONITOR: s1;",
            syntax(SyntaxError::MissingConnectionsKeyword),
        ),
        (
            "DEVICES: SWITCH s1 0, XOR x1; CONNECTIONS: s1 -> x1.I1, s1 -> x1.I2; s1;",
            syntax(SyntaxError::MissingMonitorKeyword),
        ),
        (
            "DEVICES: SWITCH s1 0; CONNECTIONS: s1 s1;",
            syntax(SyntaxError::MissingArrow),
        ),
        (
            "DEVICES: SWITCH s1 0; CONNECTIONS: s1. -> s1;",
            syntax(SyntaxError::PortMissing),
        ),
        (
            "DEVICES: SWITCH s1 0, NAND 2; CONNECTIONS: s1 -> s1;",
            syntax(SyntaxError::InvalidDeviceName),
        ),
        (
            "DEVICES: BUFFER b1; CONNECTIONS: s1 -> s1;",
            DeviceError::BadDeviceKind.into(),
        ),
    ];
    for (source, kind) in cases {
        let outcome = check(source);
        assert!(!outcome.ok, "{source}");
        assert_eq!(outcome.kinds()[0], kind, "{source}");
    }
}

#[test]
fn test_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flip_flop.def");
    fs::write(&path, FLIP_FLOP).unwrap();

    let mut names = SymbolTable::new();
    let mut circuit = Circuit::new(&mut names);
    let mut sink = WriterSink::new(Vec::new());
    let errors = dsl::parse_file(&path, &mut names, &mut circuit, &mut sink).unwrap();
    assert_eq!(errors, 0);
    assert!(sink.into_inner().is_empty());
    assert_eq!(circuit.devices().len(), 5);
}

#[test]
fn test_parse_file_streams_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.def");
    fs::write(&path, "DEVICES: SWITCH s1 0,").unwrap();

    let mut names = SymbolTable::new();
    let mut circuit = Circuit::new(&mut names);
    let mut sink = WriterSink::new(Vec::new());
    let errors = dsl::parse_file(&path, &mut names, &mut circuit, &mut sink).unwrap();
    assert_eq!(errors, 1);
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(text, "Error: file ended abruptly\n\n");
}

#[test]
fn test_parse_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.def");

    let mut names = SymbolTable::new();
    let mut circuit = Circuit::new(&mut names);
    let err = dsl::parse_file(&path, &mut names, &mut circuit, Vec::<Diagnostic>::new()).unwrap_err();
    assert!(matches!(err, LogsimError::FileReadError { .. }));
}
