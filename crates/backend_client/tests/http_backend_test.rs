//! Wire-contract tests for HttpBackend against a mock HTTP server

use backend_client::{BackendApi, BackendError, HttpBackend};
use console_core::{
    ChatRequest, Condition, EntryId, NewTaxonomyEntry, ProductPayload, TaxonomyEntry,
    TaxonomyKind,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, HttpBackend) {
    let mock_server = MockServer::start().await;
    let backend = HttpBackend::with_client(&mock_server.uri(), reqwest::Client::new())
        .expect("backend");
    (mock_server, backend)
}

fn sample_payload() -> ProductPayload {
    ProductPayload {
        name: "iPhone 12".to_string(),
        category_id: Some(EntryId::new("c1")),
        brand_id: None,
        price: 3999.0,
        description: String::new(),
        specifications: Some("128GB".to_string()),
        condition: Condition::SemiNew,
        stock: 2,
    }
}

#[tokio::test]
async fn test_probe_succeeds_on_any_success_response() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "funcionando"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend.probe().await.expect("probe");
}

#[tokio::test]
async fn test_probe_fails_when_backend_unreachable() {
    let backend =
        HttpBackend::with_client("http://127.0.0.1:1", reqwest::Client::new()).expect("backend");

    let err = backend.probe().await.expect_err("unreachable backend");
    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_send_message_uses_backend_field_names() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/mensagem"))
        .and(body_json(json!({"texto": "tem iphone?", "origem": "web", "usuario_id": "user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sucesso": true,
            "mensagem": "Tenho iPhone 12 sim!",
            "transferir_humano": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = backend
        .send_message(&ChatRequest {
            text: "tem iphone?".to_string(),
            origin: "web".to_string(),
            user_id: "user".to_string(),
        })
        .await
        .expect("reply");

    assert_eq!(reply.message, "Tenho iPhone 12 sim!");
    assert!(reply.transfer_to_human);
}

#[tokio::test]
async fn test_list_taxonomy_hits_kind_collection() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/marcas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b1", "nome": "Apple", "descricao": "", "criado_em": "2024-05-01 10:00:00"},
            {"id": "b2", "nome": "Samsung", "descricao": null}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let brands = backend.list_taxonomy(TaxonomyKind::Brand).await.expect("brands");
    assert_eq!(
        brands,
        vec![TaxonomyEntry::new("b1", "Apple"), TaxonomyEntry::new("b2", "Samsung")]
    );
}

#[tokio::test]
async fn test_create_taxonomy_falls_back_to_requested_name() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/categorias"))
        .and(body_json(json!({"nome": "Tablets", "descricao": ""})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "c9", "mensagem": "Categoria criada!"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = backend
        .create_taxonomy(TaxonomyKind::Category, &NewTaxonomyEntry::named("Tablets"))
        .await
        .expect("created");
    assert_eq!(created, TaxonomyEntry::new("c9", "Tablets"));
}

#[tokio::test]
async fn test_create_taxonomy_rejection_maps_to_status_error() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/categorias"))
        .respond_with(ResponseTemplate::new(500).set_body_string("UNIQUE constraint failed"))
        .mount(&mock_server)
        .await;

    let err = backend
        .create_taxonomy(TaxonomyKind::Category, &NewTaxonomyEntry::named("Phones"))
        .await
        .expect_err("rejected");

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("UNIQUE"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_product_crud_paths() {
    let (mock_server, backend) = setup().await;
    let payload = sample_payload();

    Mock::given(method("POST"))
        .and(path("/dados/produtos"))
        .and(body_json(serde_json::to_value(&payload).unwrap()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "mensagem": "Produto criado!"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/dados/produtos/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mensagem": "Produto atualizado!"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/dados/produtos/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mensagem": "Produto removido!"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let id = backend.create_product(&payload).await.expect("create");
    assert_eq!(id, Some(EntryId::new("p1")));

    let id = EntryId::new("p1");
    backend.update_product(&id, &payload).await.expect("update");
    backend.delete_product(&id).await.expect("delete");
}

#[tokio::test]
async fn test_list_products_decodes_joined_names() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dados/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "p1",
            "nome": "Galaxy S23",
            "categoria_id": "c1",
            "marca_id": "b2",
            "preco": 4500.0,
            "descricao": "Seminovo",
            "especificacoes": null,
            "condicao": "usado",
            "estoque": 0,
            "ativo": 1,
            "categoria_nome": "Phones",
            "marca_nome": "Samsung"
        }])))
        .mount(&mock_server)
        .await;

    let products = backend.list_products().await.expect("products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].brand_name.as_deref(), Some("Samsung"));
    assert_eq!(products[0].condition, Condition::Used);
}

#[tokio::test]
async fn test_get_product_maps_erro_body_to_not_found() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dados/produtos/missing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"erro": "Produto não encontrado"})),
        )
        .mount(&mock_server)
        .await;

    let err = backend
        .get_product(&EntryId::new("missing"))
        .await
        .expect_err("not found");
    assert!(matches!(err, BackendError::NotFound(_)));
}

#[tokio::test]
async fn test_list_history_sends_limit() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/historico"))
        .and(query_param("limite", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "h1",
            "texto": "oi",
            "origem": "web",
            "usuario_id": "user",
            "resposta": "E aí!",
            "processado_em": "2024-05-01 10:00:00"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let history = backend.list_history(20).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].response.as_deref(), Some("E aí!"));
}

#[tokio::test]
async fn test_clear_conversation_path() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/historico/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mensagem": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend.clear_conversation("user").await.expect("cleared");
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = backend
        .list_taxonomy(TaxonomyKind::Category)
        .await
        .expect_err("decode failure");
    assert!(matches!(err, BackendError::Decode(_)));
}
