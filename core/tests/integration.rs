//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `NocoDb` with the
//! real `UreqTransport` over HTTP. Validates URL building, header handling,
//! response parsing and error normalisation against an actual server.

use std::net::SocketAddr;
use std::time::Duration;

use nocodb_core::{
    AdvisorQuery, AdvisorService, ApiError, CreateAdvisor, NocoDb, NocoDbClient, NocoDbConfig,
    Record, RequestOptions, Selection, UpdateAdvisor, UreqTransport,
};
use serde_json::json;

const TOKEN: &str = "integration-token";
const TABLE: &str = "mk3y12zsd2xgngl";

/// Start the mock server on its own thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, TOKEN).await
        })
        .unwrap();
    });

    addr
}

fn connect(addr: SocketAddr, token: &str) -> NocoDb {
    let config = NocoDbConfig::new(&format!("http://{addr}"), token).unwrap();
    NocoDb::connect(&config)
}

#[test]
fn advisor_lifecycle() {
    let db = connect(start_server(), TOKEN);
    let advisors = AdvisorService::new(&db, TABLE).unwrap();

    // Step 1: list — should be empty.
    let page = advisors.list(&AdvisorQuery::default()).unwrap();
    assert!(page.list.is_empty(), "expected empty list");
    assert_eq!(page.page_info.total_rows, Some(0));

    // Step 2: create two advisors, one inactive.
    let juan = advisors
        .create(&CreateAdvisor {
            name: "Juan Pérez".to_string(),
            phone: "+57 300 123 4567".to_string(),
            email: Some("juan@autorunai.tech".to_string()),
            primary_color: Some("#1a56db".to_string()),
            active: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(juan.id, 1);
    assert_eq!(juan.name, "Juan Pérez");

    let maria = advisors
        .create(&CreateAdvisor {
            name: "María González".to_string(),
            phone: "+57 300 234 5678".to_string(),
            active: Some(false),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(maria.id, 2);

    // Step 3: get.
    let fetched = advisors.get(juan.id).unwrap();
    assert_eq!(fetched, juan);

    // Step 4: list active only.
    let page = advisors
        .list(&AdvisorQuery {
            active_only: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(page.list, vec![juan.clone()]);

    // Step 5: partial update leaves other fields alone.
    let updated = advisors
        .update(&UpdateAdvisor {
            id: maria.id,
            active: Some(true),
            slug: Some("maria".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.name, "María González");
    assert_eq!(updated.active, Some(true));
    assert_eq!(updated.slug.as_deref(), Some("maria"));

    // Step 6: paging.
    let page = advisors
        .list(&AdvisorQuery {
            active_only: true,
            limit: Some(1),
            offset: Some(1),
        })
        .unwrap();
    assert_eq!(page.list.len(), 1);
    assert_eq!(page.list[0].id, maria.id);
    assert_eq!(page.page_info.is_last_page, Some(true));

    // Step 7: delete through the generic client.
    db.delete(&format!("{TABLE}/records/{}", juan.id), &RequestOptions::default())
        .unwrap();

    // Step 8: get after delete — 404 with the server's message.
    let err = advisors.get(juan.id).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "[404] Record '1' not found");

    // Step 9: delete again — still 404.
    let err = db
        .delete(&format!("{TABLE}/records/{}", juan.id), &RequestOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));

    // Step 10: one left.
    let page = advisors.list(&AdvisorQuery::default()).unwrap();
    assert_eq!(page.list.len(), 1);
}

#[test]
fn untyped_records_round_trip() {
    let db = connect(start_server(), TOKEN);

    let moto = json!({ "modelo": "Pulsar NS 200", "marca": "Bajaj", "cilindrada": "200cc" });
    let created: Record = db
        .post("motos/records", &RequestOptions::new().body(&moto).unwrap())
        .unwrap();
    assert_eq!(created["Id"], 1);
    assert_eq!(created["marca"], "Bajaj");

    let patched: Record = db
        .patch(
            "motos/records",
            &RequestOptions::new()
                .body(&json!({ "Id": 1, "cilindrada": "199.5cc" }))
                .unwrap(),
        )
        .unwrap();
    assert_eq!(patched["modelo"], "Pulsar NS 200");
    assert_eq!(patched["cilindrada"], "199.5cc");

    let fetched: Record = db.get("motos/records/1", &RequestOptions::default()).unwrap();
    assert_eq!(fetched, patched);
}

#[test]
fn wrong_token_is_reported_with_server_message() {
    let db = connect(start_server(), "not-the-token");
    let err = db
        .get::<Record>(&format!("{TABLE}/records"), &RequestOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "[401] Authentication required - Invalid token");
}

#[test]
fn caller_token_header_overrides_default() {
    let db = connect(start_server(), "not-the-token");
    let options = RequestOptions::new().header("xc-token", TOKEN);
    let page: serde_json::Value = db.get(&format!("{TABLE}/records"), &options).unwrap();
    assert_eq!(page["list"], json!([]));
}

#[test]
fn invalid_filter_surfaces_structured_message() {
    let db = connect(start_server(), TOKEN);
    let options = RequestOptions::new().param("where", "activo");
    let err = db
        .get::<Record>(&format!("{TABLE}/records"), &options)
        .unwrap_err();
    assert_eq!(err.to_string(), "[400] Invalid filter expression: activo");
}

#[test]
fn non_json_error_body_is_used_verbatim() {
    let db = connect(start_server(), TOKEN);
    // No `/records` suffix: outside the table routes, answered in plain text.
    let err = db.get::<Record>(TABLE, &RequestOptions::default()).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), format!("[404] Cannot GET /api/v2/tables/{TABLE}"));
}

#[test]
fn huge_offset_yields_an_empty_page() {
    let db = connect(start_server(), TOKEN);
    let options = RequestOptions::new().param("offset", u64::MAX.to_string());
    let page: serde_json::Value = db.get(&format!("{TABLE}/records"), &options).unwrap();
    assert_eq!(page["list"], json!([]));
}

#[test]
fn timed_transport_still_reports_statuses() {
    let addr = start_server();
    let config = NocoDbConfig::new(&format!("http://{addr}"), TOKEN).unwrap();
    let db = NocoDb::with_transport(
        NocoDbClient::new(&config),
        UreqTransport::with_timeout(Duration::from_secs(5)),
    );
    let err = db
        .get::<Record>(&format!("{TABLE}/records/1"), &RequestOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
    assert_eq!(err.to_string(), "[404] Record '1' not found");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let db = connect(addr, TOKEN);
    let err = db
        .get::<Record>(&format!("{TABLE}/records"), &RequestOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::TransportError(_)));
    assert_eq!(err.status(), None);
}

#[test]
fn selection_shares_a_fetched_advisor() {
    let db = connect(start_server(), TOKEN);
    let advisors = AdvisorService::new(&db, TABLE).unwrap();
    let created = advisors
        .create(&CreateAdvisor {
            name: "Asesor Auteco".to_string(),
            phone: "+57 300 000 0000".to_string(),
            ..Default::default()
        })
        .unwrap();

    let selection = Selection::new();
    let header = selection.subscribe();
    let details = selection.subscribe();

    selection.select(advisors.get(created.id).unwrap());
    assert!(header.has_changed());
    assert_eq!(details.current().map(|a| a.name), Some("Asesor Auteco".to_string()));

    selection.clear();
    assert!(!header.is_selected());
    assert_eq!(details.current(), None);
}
