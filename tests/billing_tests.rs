// tests/billing_tests.rs

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::{TestApp, seed_product, seed_user};
use licorhub_backend::models::auth::UserRole;

// Crea un pedido de una sola línea y devuelve su id.
async fn seed_order(
    app: &TestApp,
    office_token: &str,
    customer_id: &str,
    product_id: &str,
    total_cents: i64,
) -> String {
    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(office_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Calle 50 # 46-36",
                "totalCents": total_cents,
                "items": [{ "productId": product_id, "quantity": 1, "unitPriceCents": total_cents }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "pedido no creado: {body}");
    body["id"].as_str().expect("pedido sin id").to_string()
}

#[tokio::test]
async fn emitir_una_factura_deriva_numero_fechas_e_iva() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "AGU-750").await;
    let order_id = seed_order(&app, &admin_token, &customer_id, &product_id, 100_000).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": order_id })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "factura no emitida: {body}");
    assert_eq!(body["invoiceNumber"], format!("INV-{}", &order_id[..8]));
    assert_eq!(body["status"], "pendiente");
    assert_eq!(body["orderId"], order_id.as_str());
    // IVA del 19% sobre el total del pedido
    assert_eq!(body["taxCents"], 19_000);
    assert_eq!(body["totalCents"], 119_000);

    let today = Utc::now().date_naive();
    assert_eq!(body["issueDate"], today.to_string());
    assert_eq!(body["dueDate"], (today + Duration::days(30)).to_string());
}

#[tokio::test]
async fn el_iva_se_trunca_con_division_entera() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "CER-330").await;
    // 99 * 19 / 100 = 18.81, que truncado queda en 18
    let order_id = seed_order(&app, &admin_token, &customer_id, &product_id, 99).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": order_id })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["taxCents"], 18);
    assert_eq!(body["totalCents"], 117);
}

#[tokio::test]
async fn un_pedido_no_se_factura_dos_veces() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "RON-750").await;
    let order_id = seed_order(&app, &admin_token, &customer_id, &product_id, 52_000).await;

    let (status, _) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": order_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": order_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Este pedido ya tiene una factura emitida.");
}

#[tokio::test]
async fn facturar_un_pedido_inexistente_responde_404() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": "pedido-fantasma" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Pedido no encontrado.");
}

#[tokio::test]
async fn pagar_una_factura_persiste_el_estado_y_no_se_repite() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "TEQ-750").await;
    let order_id = seed_order(&app, &admin_token, &customer_id, &product_id, 85_000).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&admin_token),
            Some(json!({ "orderId": order_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let invoice_id = body["id"].as_str().expect("factura sin id").to_string();

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/billing/invoices/{invoice_id}/pay"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "pago fallido: {body}");
    assert_eq!(body["status"], "pagada");

    // El pago quedó en la base, no solo en la respuesta
    let (status, body) = app
        .request("GET", "/api/billing/invoices", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "pagada");

    // El segundo intento de pago se rechaza
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/billing/invoices/{invoice_id}/pay"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Esta factura ya fue pagada.");
}

#[tokio::test]
async fn una_factura_vencida_se_paga_pero_una_cancelada_no() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "VIN-750").await;

    let mut invoice_ids = Vec::new();
    for sku_total in [30_000, 45_000] {
        let order_id = seed_order(&app, &admin_token, &customer_id, &product_id, sku_total).await;
        let (status, body) = app
            .request(
                "POST",
                "/api/billing/invoices",
                Some(&admin_token),
                Some(json!({ "orderId": order_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        invoice_ids.push(body["id"].as_str().expect("factura sin id").to_string());
    }

    // Se fuerzan los estados directamente en la base
    sqlx::query("UPDATE invoices SET status = 'vencida' WHERE id = $1")
        .bind(&invoice_ids[0])
        .execute(&app.state.db_pool)
        .await
        .expect("no se pudo forzar el estado");
    sqlx::query("UPDATE invoices SET status = 'cancelada' WHERE id = $1")
        .bind(&invoice_ids[1])
        .execute(&app.state.db_pool)
        .await
        .expect("no se pudo forzar el estado");

    // Una factura vencida todavía acepta el pago
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/billing/invoices/{}/pay", invoice_ids[0]),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pagada");

    // Una cancelada no
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/billing/invoices/{}/pay", invoice_ids[1]),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No se puede pagar una factura cancelada.");

    // Y una inexistente da 404
    let (status, body) = app
        .request("POST", "/api/billing/invoices/no-existe/pay", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Factura no encontrada.");
}

#[tokio::test]
async fn cada_cliente_ve_solo_sus_facturas_en_mine() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (ana_token, ana_id) = seed_user(&app, "ana@example.com", UserRole::Cliente).await;
    let (_, beto_id) = seed_user(&app, "beto@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &admin_token, "GIN-700").await;

    for customer in [&ana_id, &beto_id] {
        let order_id = seed_order(&app, &admin_token, customer, &product_id, 66_000).await;
        let (status, _) = app
            .request(
                "POST",
                "/api/billing/invoices",
                Some(&admin_token),
                Some(json!({ "orderId": order_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request("GET", "/api/billing/invoices/mine", Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let invoices = body.as_array().expect("la respuesta no es un array");
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["customerId"], ana_id.as_str());
    assert!(invoices[0]["customerName"].is_string());
    // El listado trae el total del pedido de origen junto al facturado
    assert_eq!(invoices[0]["orderTotalCents"], 66_000);

    // La lista completa y la emisión son del personal de oficina
    let (status, _) = app
        .request("GET", "/api/billing/invoices", Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "POST",
            "/api/billing/invoices",
            Some(&ana_token),
            Some(json!({ "orderId": "alguno" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
