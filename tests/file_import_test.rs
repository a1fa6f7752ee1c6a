// ==========================================
// 文件导入集成测试
// ==========================================
// 测试目标: CSV / XLSX → 表头定位 → 列解析 → 记录映射 → 分类
// ==========================================

mod test_helpers;

use procurement_kpi::config::ClassifierConfig;
use procurement_kpi::engine::RowClassifier;
use procurement_kpi::importer::{
    ColumnBinding, ColumnField, ColumnSchema, HeaderLocator, ImportError, ProcurementImporter,
    ProcurementImporterImpl, SchemaError, UniversalFileParser,
};
use procurement_kpi::logging;
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::{row, scenario_rows, write_csv, write_xlsx, STANDARD_HEADERS};

fn default_importer() -> ProcurementImporterImpl {
    ProcurementImporterImpl::from_config(&ClassifierConfig::default())
}

#[tokio::test]
async fn test_import_csv_with_title_rows() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reporte.csv");
    std::fs::write(
        &path,
        "REPORTE DE SEGUIMIENTO,,,,,\n\
         Proyecto: Planta Norte,,,,,\n\
         No. S.C.,CANT ITEM S.C.,DESCRIPCION DE LA PARTIDA,No. O.C.,FECHA DE LLEGADA,ESTATUS GRN\n\
         1001,5,TUBO,OC-1,15/03/2024,RECV\n\
         1002,3,CODO,,,PEND\n\
         ,,,,,\n\
         TOTAL,8,,,,\n",
    )
    .unwrap();

    let imported = default_importer().import_file(&path).await.unwrap();

    // 空白行在解析阶段跳过
    assert_eq!(imported.records.len(), 3);
    assert_eq!(imported.source_file.as_deref(), Some("reporte.csv"));
    assert_eq!(imported.records[0].source_row, 4);
    assert_eq!(imported.records[0].requisition_id, Some(1001.0));
    assert_eq!(imported.records[2].requisition_id, None);

    let result = RowClassifier::from_config(&ClassifierConfig::default())
        .classify(&imported.records)
        .unwrap();
    assert_eq!(result.kpis.requested_count, 2);
    assert_eq!(result.kpis.received_count, 1);
    assert_eq!(result.kpis.missing_po_count, 1);
    assert_eq!(result.worklist[0].arrival_date, "2024-03-15");
}

#[tokio::test]
async fn test_import_semicolon_csv_with_comma_in_title() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lima.csv");
    std::fs::write(
        &path,
        "Obra: Planta Norte, Lima\n\
         No. S.C.;CANT ITEM S.C.;DESCRIPCION DE LA PARTIDA;No. O.C.;FECHA DE LLEGADA;ESTATUS GRN\n\
         1001;2,5;TUBO;OC-1;15/03/2024;RECV\n\
         1002;3;CODO;;;PEND\n",
    )
    .unwrap();

    let imported = default_importer().import_file(&path).await.unwrap();

    assert_eq!(imported.records.len(), 2);
    assert_eq!(imported.records[0].quantity, Some(2.5));
    assert_eq!(imported.records[1].po_ref, None);

    let result = RowClassifier::from_config(&ClassifierConfig::default())
        .classify(&imported.records)
        .unwrap();
    assert_eq!(result.kpis.requested_count, 2);
    assert_eq!(result.kpis.received_count, 1);
    assert_eq!(result.kpis.missing_po_count, 1);
}

#[tokio::test]
async fn test_import_xlsx_with_numeric_cells() {
    logging::init_test();

    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "materiales.xlsx",
        &["CONTROL DE MATERIALES", ""],
        &STANDARD_HEADERS,
        &scenario_rows(),
    );

    let imported = default_importer().import_file(&path).await.unwrap();
    assert_eq!(imported.records.len(), 3);

    let result = RowClassifier::from_config(&ClassifierConfig::default())
        .classify(&imported.records)
        .unwrap();

    assert_eq!(result.kpis.requested_count, 2);
    assert_eq!(result.kpis.received_count, 1);
    assert_eq!(result.kpis.progress_pct, 50.0);
    // 数值单元格显示为整数文本
    assert_eq!(result.worklist[0].id, "1001");
    assert_eq!(result.worklist[0].quantity, "5");
    assert_eq!(result.worklist[0].po_ref, "OC-77");
}

#[tokio::test]
async fn test_missing_columns_are_listed() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "incompleto.csv",
        &["No. S.C.", "CANT ITEM S.C.", "DESCRIPCION DE LA PARTIDA", "No. O.C."],
        &[vec!["1".into(), "1".into(), "A".into(), "OC".into()]],
    );

    let err = default_importer().import_file(&path).await.unwrap_err();
    match err {
        ImportError::Schema(SchemaError::MissingColumns { missing }) => {
            assert_eq!(missing, vec!["FECHA DE LLEGADA", "ESTATUS GRN"]);
        }
        other => panic!("error inesperado: {:?}", other),
    }
}

#[tokio::test]
async fn test_header_not_found() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "sin_encabezado.csv",
        &["SC", "CANTIDAD"],
        &[vec!["1".into(), "2".into()]],
    );

    let err = default_importer().import_file(&path).await.unwrap_err();
    assert!(matches!(err, ImportError::HeaderNotFound { .. }));
}

#[tokio::test]
async fn test_positional_schema() {
    let dir = TempDir::new().unwrap();
    let headers = ["ID", "X", "CANT", "DESC", "OC", "LLEGADA", "ESTADO"];
    let rows = vec![
        vec!["7", "-", "2", "PERNO", "OC-9", "", "RECV"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>(),
    ];
    let path = write_csv(dir.path(), "posicional.csv", &headers, &rows);

    let mut schema = ColumnSchema::default();
    for (field, position) in [
        (ColumnField::RequisitionId, 0),
        (ColumnField::Quantity, 2),
        (ColumnField::Description, 3),
        (ColumnField::PoRef, 4),
        (ColumnField::ArrivalDate, 5),
        (ColumnField::Status, 6),
    ] {
        schema.set_binding(field, ColumnBinding::Position(position));
    }

    let importer = ProcurementImporterImpl::new(
        Arc::new(UniversalFileParser::default()),
        HeaderLocator::FixedOffset { row: 0 },
        schema.clone(),
    );
    let imported = importer.import_file(&path).await.unwrap();
    assert_eq!(imported.records[0].quantity, Some(2.0));
    assert_eq!(imported.records[0].status.as_deref(), Some("RECV"));

    // 位置超出列数 → TooFewColumns
    schema.set_binding(ColumnField::Status, ColumnBinding::Position(14));
    let importer = ProcurementImporterImpl::new(
        Arc::new(UniversalFileParser::default()),
        HeaderLocator::FixedOffset { row: 0 },
        schema,
    );
    let err = importer.import_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        ImportError::Schema(SchemaError::TooFewColumns { required: 15, actual: 7 })
    ));
}

#[tokio::test]
async fn test_sheet_not_found() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(dir.path(), "hojas.xlsx", &[], &STANDARD_HEADERS, &scenario_rows());

    let config = ClassifierConfig {
        sheet_name: Some("Resumen".to_string()),
        ..ClassifierConfig::default()
    };
    let err = ProcurementImporterImpl::from_config(&config)
        .import_file(&path)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::SheetNotFound(name) if name == "Resumen"));
}

#[tokio::test]
async fn test_batch_import_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let good = write_csv(
        dir.path(),
        "bueno.csv",
        &STANDARD_HEADERS,
        &[row("1", "1", "A", "OC", "", "RECV")],
    );
    let missing = dir.path().join("no_existe.xlsx");

    let results = default_importer()
        .batch_import(vec![good.clone(), missing, good])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}
