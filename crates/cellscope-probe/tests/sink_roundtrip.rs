//! Sink integration tests: files written by the sinks read back intact.

use cellscope_common::{
    AttachState, CellType, NeighborCell, NeighborList, NormalizedRecord, RegistrationState,
    Technology,
};
use cellscope_probe::sink::{CsvSink, JsonLinesSink, read_csv_records};
use cellscope_probe::{OutputFormat, RecordSink, open_sink};

fn populated_record() -> NormalizedRecord {
    NormalizedRecord {
        timestamp: "2026-10-18 12:00:00.123".into(),
        rrc_state: "CONNECT".into(),
        cell_type: Some(CellType::Serving),
        technology: Some(Technology::NrSa),
        mcc: "001".into(),
        mnc: "01".into(),
        cell_id: "ABCDEF012".into(),
        pci: "500".into(),
        tac_lac: "00AB12".into(),
        earfcn_arfcn: "632448".into(),
        band: "78".into(),
        bandwidth: "".into(),
        scs: "1".into(),
        rsrp: "-92".into(),
        rsrq: "-11".into(),
        sinr: "15".into(),
        eps_state: Some(RegistrationState::from_code("5")),
        eps_tac: "1A2B".into(),
        nr5g_state: Some(RegistrationState::from_code("42")),
        sim_state: "READY".into(),
        operator: "Test, PLMN".into(),
        attach_state: Some(AttachState::Detached),
        neighbor_count: 2,
        best_neighbor_rsrp: Some(-88),
        neighbor_cells: NeighborList(vec![
            NeighborCell::Nr5g {
                arfcn: "632448".into(),
                pci: "501".into(),
                rsrp: "-101".into(),
                rsrq: "-12".into(),
                sinr: "".into(),
            },
            NeighborCell::Wcdma {
                uarfcn: "10700".into(),
                psc: "300".into(),
                rscp: "-88".into(),
                ecio: "-7".into(),
                srxlev: "25".into(),
            },
        ]),
        csq_rssi: "20".into(),
        csq_ber: "99".into(),
        serving_cell_count: 1,
        ca_info: r#""pcc",1300,75,"LTE BAND 3"; "scc",6300,50,"LTE BAND 20""#.into(),
        ..NormalizedRecord::default()
    }
}

#[test]
fn csv_round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");

    let records = vec![
        populated_record(),
        NormalizedRecord::stamped("2026-10-18 12:00:05.000"),
    ];
    {
        let mut sink = CsvSink::create(&path).unwrap();
        for rec in &records {
            sink.append(rec).unwrap();
        }
        sink.close().unwrap();
        assert_eq!(sink.rows(), 2);
    }

    let back = read_csv_records(&path).unwrap();
    assert_eq!(back, records);
}

#[test]
fn csv_header_matches_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let mut sink = CsvSink::create(&path).unwrap();
    sink.close().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, NormalizedRecord::COLUMNS.join(","));
    assert!(header.contains("neighbor_cells_json"));
}

#[test]
fn rows_are_flushed_before_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let mut sink = CsvSink::create(&path).unwrap();
    sink.append(&populated_record()).unwrap();

    // Still open: the row must already be on disk.
    let back = read_csv_records(&path).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].neighbor_cells.len(), 2);
}

#[test]
fn json_lines_one_object_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");
    let mut sink = JsonLinesSink::create(&path).unwrap();
    sink.append(&populated_record()).unwrap();
    sink.append(&NormalizedRecord::stamped("t")).unwrap();
    sink.close().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["technology"], "NR5G-SA");
    assert_eq!(first["eps_state"], "REGISTERED_ROAMING");
    assert_eq!(first["nr5g_state"], "UNKNOWN_42");
    assert_eq!(first["best_neighbor_rsrp"], -88);
    assert!(first["neighbor_cells_json"].as_str().unwrap().contains("\"tech\":\"5G\""));

    let back: NormalizedRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(back, populated_record());
}

#[test]
fn open_sink_creates_directory_and_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("network_data");

    let mut sink = open_sink(&out, OutputFormat::Csv).unwrap();
    sink.append(&populated_record()).unwrap();
    sink.close().unwrap();

    let path = sink.path().unwrap().to_path_buf();
    assert!(path.starts_with(&out));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("rm520n_network_data_"), "{name}");
    assert!(name.ends_with(".csv"), "{name}");
    assert_eq!(read_csv_records(&path).unwrap().len(), 1);
}
