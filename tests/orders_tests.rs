// tests/orders_tests.rs

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, seed_product, seed_user, warehouse_id_by_name};
use licorhub_backend::models::auth::UserRole;

#[tokio::test]
async fn crear_un_pedido_guarda_las_lineas_y_respeta_el_total_del_caller() {
    let app = TestApp::spawn().await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let aguardiente = seed_product(&app, &admin_token, "AGU-750").await;
    let ron = seed_product(&app, &admin_token, "RON-750").await;

    // Las líneas suman 130.000 pero el caller manda 120.000 (descuento
    // aplicado afuera): el total se guarda tal cual llega.
    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&oficinista_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Calle 33 # 74-12, Laureles",
                "totalCents": 120_000,
                "notes": "Entregar en portería",
                "items": [
                    { "productId": aguardiente, "quantity": 2, "unitPriceCents": 45_000 },
                    { "productId": ron, "quantity": 1, "unitPriceCents": 40_000 },
                ],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "pedido no creado: {body}");
    assert_eq!(body["status"], "pendiente");
    assert_eq!(body["totalCents"], 120_000);
    assert_eq!(body["customerId"], customer_id.as_str());
    assert!(body["customerName"].is_string());
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    // El subtotal de cada línea sí se calcula en el servidor
    let items = body["items"].as_array().expect("pedido sin líneas");
    let aguardiente_line = items
        .iter()
        .find(|i| i["productId"] == aguardiente.as_str())
        .expect("falta la línea de aguardiente");
    assert_eq!(aguardiente_line["subtotalCents"], 90_000);

    // Releído desde la lista, el total sigue intacto
    let (status, body) = app.request("GET", "/api/orders", Some(&oficinista_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().expect("la respuesta no es un array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["totalCents"], 120_000);
}

#[tokio::test]
async fn un_pedido_con_producto_inexistente_no_deja_nada_persistido() {
    let app = TestApp::spawn().await;
    let (token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let real = seed_product(&app, &token, "GIN-700").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Carrera 80 # 30-15",
                "totalCents": 50_000,
                "items": [
                    { "productId": real, "quantity": 1, "unitPriceCents": 30_000 },
                    { "productId": "producto-fantasma", "quantity": 1, "unitPriceCents": 20_000 },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado.");

    // La cabecera que alcanzó a insertarse se revirtió con la transacción
    let (status, body) = app.request("GET", "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn un_pedido_sin_lineas_o_sin_cliente_se_rechaza() {
    let app = TestApp::spawn().await;
    let (token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customerId": "cualquiera",
                "shippingAddress": "Calle 10 # 5-21",
                "totalCents": 10_000,
                "items": [],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["items"][0], "El pedido debe tener al menos un producto.");

    // Con cliente inexistente el pedido tampoco pasa
    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customerId": "cliente-fantasma",
                "shippingAddress": "Calle 10 # 5-21",
                "totalCents": 10_000,
                "items": [{ "productId": "algo", "quantity": 1, "unitPriceCents": 10_000 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Usuario no encontrado.");
}

#[tokio::test]
async fn cada_cliente_ve_solo_sus_pedidos_en_mine() {
    let app = TestApp::spawn().await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;
    let (bodeguero_token, _) = seed_user(&app, "bodega@licorhub.co", UserRole::Bodeguero).await;
    let (ana_token, ana_id) = seed_user(&app, "ana@example.com", UserRole::Cliente).await;
    let (beto_token, beto_id) = seed_user(&app, "beto@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &bodeguero_token, "CER-330").await;

    for (customer, total) in [(&ana_id, 19_000), (&ana_id, 28_500), (&beto_id, 9_500)] {
        let (status, _) = app
            .request(
                "POST",
                "/api/orders",
                Some(&oficinista_token),
                Some(json!({
                    "customerId": customer,
                    "shippingAddress": "Calle 44 # 80-02",
                    "totalCents": total,
                    "items": [{ "productId": product_id, "quantity": 1, "unitPriceCents": total }],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.request("GET", "/api/orders/mine", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().expect("la respuesta no es un array");
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["customerId"] == ana_id.as_str()));

    let (status, body) = app.request("GET", "/api/orders/mine", Some(&beto_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // La lista completa en cambio es del personal de oficina
    let (status, _) = app.request("GET", "/api/orders", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cambiar_el_estado_asigna_el_domiciliario_y_crea_la_entrega() {
    let app = TestApp::spawn().await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;
    let (bodeguero_token, _) = seed_user(&app, "bodega@licorhub.co", UserRole::Bodeguero).await;
    let (rider_token, rider_id) = seed_user(&app, "moto@licorhub.co", UserRole::Domiciliario).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &bodeguero_token, "TEQ-750").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&oficinista_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Carrera 43A # 1-50",
                "totalCents": 80_000,
                "items": [{ "productId": product_id, "quantity": 1, "unitPriceCents": 80_000 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["id"].as_str().expect("pedido sin id").to_string();

    // Pasa a "en proceso" con domiciliario asignado
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(&oficinista_token),
            Some(json!({
                "status": "en proceso",
                "deliveryPersonId": rider_id,
                "notes": "Salir antes de las 6",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "cambio de estado fallido: {body}");
    assert_eq!(body["status"], "en proceso");
    assert_eq!(body["deliveryPersonId"], rider_id.as_str());

    // La entrega nació junto con la asignación y refleja el estado
    let (status, body) = app.request("GET", "/api/deliveries", Some(&rider_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let deliveries = body.as_array().expect("la respuesta no es un array");
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0]["orderId"], order_id.as_str());
    assert_eq!(deliveries[0]["deliveryPersonId"], rider_id.as_str());
    assert_eq!(deliveries[0]["status"], "en proceso");
    assert_eq!(deliveries[0]["shippingAddress"], "Carrera 43A # 1-50");
    assert!(deliveries[0]["assignedAt"].is_string());
    assert!(deliveries[0]["actualDelivery"].is_null());

    // Los siguientes cambios de estado arrastran la entrega sin reasignar
    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(&rider_token),
            Some(json!({ "status": "enviado" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(&rider_token),
            Some(json!({ "status": "entregado" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Al entregar queda la marca de entrega real
    let (status, body) = app.request("GET", "/api/deliveries", Some(&rider_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let deliveries = body.as_array().expect("la respuesta no es un array");
    assert_eq!(deliveries[0]["status"], "entregado");
    assert!(deliveries[0]["actualDelivery"].is_string());
}

#[tokio::test]
async fn asignar_a_quien_no_es_domiciliario_falla_sin_cambiar_el_pedido() {
    let app = TestApp::spawn().await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;
    let (bodeguero_token, _) = seed_user(&app, "bodega@licorhub.co", UserRole::Bodeguero).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &bodeguero_token, "VIN-750").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&oficinista_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Circular 4 # 70-28",
                "totalCents": 60_000,
                "items": [{ "productId": product_id, "quantity": 2, "unitPriceCents": 30_000 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["id"].as_str().expect("pedido sin id").to_string();

    // El cliente no es repartidor: la asignación se rechaza
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(&oficinista_token),
            Some(json!({ "status": "en proceso", "deliveryPersonId": customer_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "El usuario asignado no es un domiciliario.");

    // Y el pedido sigue como estaba
    let (status, body) = app.request("GET", "/api/orders", Some(&oficinista_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "pendiente");
    assert!(body[0]["deliveryPersonId"].is_null());
}

#[tokio::test]
async fn el_cambio_de_estado_excluye_a_bodegueros_y_clientes() {
    let app = TestApp::spawn().await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;
    let (bodeguero_token, _) = seed_user(&app, "bodega@licorhub.co", UserRole::Bodeguero).await;
    let (cliente_token, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let product_id = seed_product(&app, &bodeguero_token, "PIS-700").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&oficinista_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Transversal 39 # 72-11",
                "totalCents": 42_000,
                "items": [{ "productId": product_id, "quantity": 1, "unitPriceCents": 42_000 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["id"].as_str().expect("pedido sin id").to_string();

    for token in [&bodeguero_token, &cliente_token] {
        let (status, _) = app
            .request(
                "PATCH",
                &format!("/api/orders/{order_id}/status"),
                Some(token),
                Some(json!({ "status": "cancelado" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // Un pedido inexistente da 404 para quien sí puede
    let (status, body) = app
        .request(
            "PATCH",
            "/api/orders/pedido-fantasma/status",
            Some(&oficinista_token),
            Some(json!({ "status": "cancelado" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Pedido no encontrado.");
}

#[tokio::test]
async fn las_entregas_solo_las_ven_admin_y_domiciliarios() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (oficinista_token, _) = seed_user(&app, "ventas@licorhub.co", UserRole::Oficinista).await;

    let (status, body) = app.request("GET", "/api/deliveries", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (status, _) = app
        .request("GET", "/api/deliveries", Some(&oficinista_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn un_pedido_no_descuenta_stock_al_crearse() {
    let app = TestApp::spawn().await;
    let (admin_token, _) = seed_user(&app, "admin@licorhub.co", UserRole::Admin).await;
    let (_, customer_id) = seed_user(&app, "cliente@example.com", UserRole::Cliente).await;
    let principal = warehouse_id_by_name(&app, &admin_token, "Principal").await;
    let product_id = seed_product(&app, &admin_token, "SAK-720").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/inventory/add",
            Some(&admin_token),
            Some(json!({ "productId": product_id, "warehouseId": principal, "quantity": 8 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "POST",
            "/api/orders",
            Some(&admin_token),
            Some(json!({
                "customerId": customer_id,
                "shippingAddress": "Calle 30 # 65-11",
                "totalCents": 55_000,
                "items": [{ "productId": product_id, "quantity": 3, "unitPriceCents": 18_000 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // La venta no mueve inventario: eso se registra aparte en bodega
    let (status, body) = app
        .request("GET", &format!("/api/products/{product_id}"), Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"][principal.as_str()], 8);
}
