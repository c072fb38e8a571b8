//! Integration tests for loading the sales join from a SQLite file.

use rusqlite::Connection;
use rust_decimal::Decimal;
use salesboard::config::{DashboardSettings, Driver, ResolvedConnection, WorkerSettings};
use salesboard::dashboard::AppContext;
use salesboard::loader;
use salesboard::source::{self, DataError, SqliteDatabaseClient};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE SalesOrderHeader (
    SalesOrderID INTEGER PRIMARY KEY,
    OrderDate TEXT NOT NULL,
    TotalDue REAL NOT NULL,
    ShipToAddressID INTEGER NOT NULL
);
CREATE TABLE SalesOrderDetail (
    SalesOrderDetailID INTEGER PRIMARY KEY,
    SalesOrderID INTEGER NOT NULL,
    OrderQty INTEGER NOT NULL,
    ProductID INTEGER NOT NULL,
    UnitPrice REAL NOT NULL,
    LineTotal REAL NOT NULL
);
CREATE TABLE Product (
    ProductID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    ProductNumber TEXT NOT NULL,
    ProductSubcategoryID INTEGER
);
CREATE TABLE ProductSubcategory (
    ProductSubcategoryID INTEGER PRIMARY KEY,
    ProductCategoryID INTEGER NOT NULL,
    Name TEXT NOT NULL
);
CREATE TABLE ProductCategory (
    ProductCategoryID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL
);
CREATE TABLE Address (
    AddressID INTEGER PRIMARY KEY,
    StateProvinceID INTEGER NOT NULL
);
CREATE TABLE StateProvince (
    StateProvinceID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL
);
"#;

const SEED: &str = r#"
INSERT INTO StateProvince VALUES (9, 'California'), (73, 'Texas');
INSERT INTO Address VALUES (100, 9), (200, 73);
INSERT INTO ProductCategory VALUES (1, 'Bikes'), (4, 'Accessories');
INSERT INTO ProductSubcategory VALUES (1, 1, 'Mountain Bikes'), (2, 1, 'Road Bikes'), (31, 4, 'Helmets');
INSERT INTO Product VALUES
    (771, 'Mountain-100', 'BK-M82S-38', 1),
    (749, 'Road-150', 'BK-R93R-62', 2),
    (707, 'Sport-100 Helmet', 'HL-U509-R', 31),
    (1, 'Adjustable Race', 'AR-5381', NULL);
INSERT INTO SalesOrderHeader VALUES
    (43659, '2024-01-15 00:00:00', 540.5, 100),
    (43660, '2024-02-10 00:00:00', 300.0, 200);
INSERT INTO SalesOrderDetail VALUES
    (1, 43659, 1, 771, 500.0, 500.0),
    (2, 43659, 1, 707, 34.99, 34.99),
    (3, 43659, 2, 1, 2.5, 5.0),
    (4, 43660, 1, 749, 300.0, 300.0);
"#;

fn create_db(dir: &TempDir, batch: &str) -> PathBuf {
    let path = dir.path().join("adventureworks.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(batch).unwrap();
    path
}

fn client(path: &Path) -> SqliteDatabaseClient {
    SqliteDatabaseClient::new(path)
}

#[tokio::test]
async fn test_load_joins_all_tables() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &format!("{}{}", SCHEMA, SEED));

    let dataset = loader::load(&client(&path)).await.unwrap();

    // The line whose product has no subcategory is dropped by the inner join
    assert_eq!(dataset.len(), 3);

    let helmet = dataset
        .iter()
        .find(|r| r.product_name == "Sport-100 Helmet")
        .unwrap();
    assert_eq!(helmet.order_id, 43659);
    assert_eq!(helmet.category, "Accessories");
    assert_eq!(helmet.region, "California");
    assert_eq!(helmet.product_number, "HL-U509-R");
    assert_eq!(helmet.line_total, Decimal::from_str("34.99").unwrap());
    assert_eq!(helmet.total_due, Decimal::from_str("540.5").unwrap());
    assert_eq!(helmet.year_month, "2024-01");
}

#[tokio::test]
async fn test_context_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &format!("{}{}", SCHEMA, SEED));

    let context = AppContext::load(&client(&path), DashboardSettings::default())
        .await
        .unwrap();
    let snapshot = context.session().snapshot();

    assert_eq!(snapshot.kpis.order_count, 2);
    assert_eq!(
        snapshot.kpis.total_revenue,
        Decimal::from_str("834.99").unwrap()
    );
    assert_eq!(context.options().regions, vec!["California", "Texas"]);
}

#[tokio::test]
async fn test_connect_selects_sqlite_client() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, &format!("{}{}", SCHEMA, SEED));
    let connection = ResolvedConnection {
        name: "sample".to_string(),
        driver: Driver::Sqlite,
        connection_string: path.display().to_string(),
    };

    let client = source::connect(&connection, &WorkerSettings::default())
        .await
        .unwrap();
    assert_eq!(client.driver(), Driver::Sqlite);
    assert_eq!(loader::load(client.as_ref()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_tables_are_empty_result() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, SCHEMA);

    let err = loader::load(&client(&path)).await.unwrap_err();
    assert!(matches!(err, DataError::EmptyResult));
}

#[tokio::test]
async fn test_schema_mismatch_is_query_error() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, "CREATE TABLE SalesOrderHeader (SalesOrderID INTEGER);");

    let err = loader::load(&client(&path)).await.unwrap_err();
    assert!(matches!(err, DataError::Query(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_missing_file_is_connection_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.sqlite");

    let err = loader::load(&client(&path)).await.unwrap_err();
    assert!(matches!(err, DataError::Connection(_)), "got {:?}", err);
    assert!(!path.exists());
}
