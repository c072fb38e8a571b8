//! The fixed sales query.

use crate::config::Driver;

/// Result column names, shared by the query text and the row decoder.
pub mod columns {
    pub const ORDER_ID: &str = "SalesOrderID";
    pub const ORDER_DATE: &str = "OrderDate";
    pub const TOTAL_DUE: &str = "TotalDue";
    pub const REGION: &str = "StateProvinceName";
    pub const PRODUCT_NAME: &str = "ProductName";
    pub const PRODUCT_NUMBER: &str = "ProductNumber";
    pub const CATEGORY: &str = "ProductCategory";
    pub const QUANTITY: &str = "OrderQty";
    pub const UNIT_PRICE: &str = "UnitPrice";
    pub const LINE_TOTAL: &str = "LineTotal";
}

/// Render the sales join for `driver`.
///
/// Inner joins throughout: an order line without a product category or a
/// shipping region is left out, never null-filled.
pub fn sales_query(driver: Driver) -> String {
    let t = |schema: &str, table: &str| {
        if driver.qualifies_schemas() {
            format!("{}.{}", schema, table)
        } else {
            table.to_string()
        }
    };

    format!(
        "SELECT
    soh.SalesOrderID AS {order_id},
    soh.OrderDate AS {order_date},
    soh.TotalDue AS {total_due},
    sp.Name AS {region},
    p.Name AS {product_name},
    p.ProductNumber AS {product_number},
    pc.Name AS {category},
    sod.OrderQty AS {quantity},
    sod.UnitPrice AS {unit_price},
    sod.LineTotal AS {line_total}
FROM {header} AS soh
INNER JOIN {detail} AS sod ON soh.SalesOrderID = sod.SalesOrderID
INNER JOIN {product} AS p ON sod.ProductID = p.ProductID
INNER JOIN {subcategory} AS psc ON p.ProductSubcategoryID = psc.ProductSubcategoryID
INNER JOIN {category_table} AS pc ON psc.ProductCategoryID = pc.ProductCategoryID
INNER JOIN {address} AS addr ON soh.ShipToAddressID = addr.AddressID
INNER JOIN {state} AS sp ON addr.StateProvinceID = sp.StateProvinceID",
        order_id = columns::ORDER_ID,
        order_date = columns::ORDER_DATE,
        total_due = columns::TOTAL_DUE,
        region = columns::REGION,
        product_name = columns::PRODUCT_NAME,
        product_number = columns::PRODUCT_NUMBER,
        category = columns::CATEGORY,
        quantity = columns::QUANTITY,
        unit_price = columns::UNIT_PRICE,
        line_total = columns::LINE_TOTAL,
        header = t("Sales", "SalesOrderHeader"),
        detail = t("Sales", "SalesOrderDetail"),
        product = t("Production", "Product"),
        subcategory = t("Production", "ProductSubcategory"),
        category_table = t("Production", "ProductCategory"),
        address = t("Person", "Address"),
        state = t("Person", "StateProvince"),
    )
}
