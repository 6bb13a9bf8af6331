//! Router tests over an in-memory pool

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::{Currency, FixedClock, MemberId, SequentialIdGenerator};
use domain_pool::seed::{demo_group, DEMO_GROUP_NAME};
use domain_pool::{AdvisoryGateway, GroupStore, PoolService, ScriptedAdvisory, ASSESSMENT_FAILED_NOTICE};
use interface_api::{config::ApiConfig, create_router, AppState};

struct Api {
    server: TestServer,
    members: Vec<MemberId>,
    open_claim: String,
}

fn api(advisory: ScriptedAdvisory) -> Api {
    let ids = Arc::new(SequentialIdGenerator::new());
    let group = demo_group(ids.as_ref(), DEMO_GROUP_NAME, Currency::KES).unwrap();
    let members = group.members().iter().map(|m| m.id).collect();
    let open_claim = group.pending_claims()[0].id().to_string();

    let clock = Utc.with_ymd_and_hms(2023, 11, 20, 9, 0, 0).unwrap();
    let service = PoolService::new(
        GroupStore::new(group),
        AdvisoryGateway::new(Arc::new(advisory), Duration::from_secs(30)),
    )
    .with_id_generator(ids)
    .with_clock(Arc::new(FixedClock::new(clock)));

    let state = AppState::new(Arc::new(service), ApiConfig::default());
    Api {
        server: TestServer::new(create_router(state)).unwrap(),
        members,
        open_claim,
    }
}

mod read_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let api = api(ScriptedAdvisory::approving());
        let response = api.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");

        let ready = api.server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<Value>()["advisory"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_group_snapshot() {
        let api = api(ScriptedAdvisory::approving());
        let body = api.server.get("/api/v1/group").await.json::<Value>();

        assert_eq!(body["name"], DEMO_GROUP_NAME);
        assert_eq!(body["balance"]["display"], "KES 2,500");
        assert_eq!(body["members"].as_array().unwrap().len(), 5);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 9);
        assert_eq!(body["transactions"][0]["type"], "payout");
        assert_eq!(body["pending_claims"], 1);
        assert_eq!(body["fund_health"]["analysis"], "Awaiting initial analysis...");
    }

    #[tokio::test]
    async fn test_balance() {
        let api = api(ScriptedAdvisory::approving());
        let body = api.server.get("/api/v1/pool/balance").await.json::<Value>();
        assert_eq!(body["currency"], "KES");
        assert_eq!(body["display"], "KES 2,500");
    }

    #[tokio::test]
    async fn test_claim_listing_filters() {
        let api = api(ScriptedAdvisory::approving());

        let all = api.server.get("/api/v1/claims").await.json::<Value>();
        assert_eq!(all.as_array().unwrap().len(), 2);

        let open = api
            .server
            .get("/api/v1/claims")
            .add_query_param("status", "PENDING_VOTE")
            .await
            .json::<Value>();
        assert_eq!(open.as_array().unwrap().len(), 1);
        assert_eq!(open[0]["claimant_name"], "Peter Musyoka");
    }

    #[tokio::test]
    async fn test_unknown_claim_is_404() {
        let api = api(ScriptedAdvisory::approving());
        let response = api
            .server
            .get("/api/v1/claims/00000000-0000-0000-0000-00000000ffff")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "not_found");
    }

    #[tokio::test]
    async fn test_fund_health_fallback_keeps_notice() {
        let api = api(ScriptedAdvisory::failing());
        let body = api.server.get("/api/v1/fund-health").await.json::<Value>();

        assert_eq!(body["health"]["status"], "Unknown");
        assert!(body["last_known"].is_null());
        assert!(body["notice"].is_string());
    }
}

mod write_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_file_claim() {
        let api = api(ScriptedAdvisory::approving());
        let response = api
            .server
            .post("/api/v1/claims")
            .json(&json!({
                "member_id": api.members[3],
                "description": "Cracked headlamp after a pothole",
                "amount": "1200"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "PENDING_VOTE");
        assert_eq!(body["claimant_name"], "Mary Wanjiru");
        assert_eq!(body["ai_assessment"]["recommendation"], "Approve");
        assert!(body["notice"].is_null());
    }

    #[tokio::test]
    async fn test_file_claim_with_advisory_down() {
        let api = api(ScriptedAdvisory::failing());
        let body = api
            .server
            .post("/api/v1/claims")
            .json(&json!({
                "member_id": api.members[1],
                "description": "Stolen side mirror",
                "amount": 800
            }))
            .await
            .json::<Value>();

        assert_eq!(body["status"], "PENDING_VOTE");
        assert_eq!(body["ai_assessment"]["recommendation"], "Needs Review");
        assert_eq!(body["notice"], ASSESSMENT_FAILED_NOTICE);
    }

    #[tokio::test]
    async fn test_invalid_claim_is_422() {
        let api = api(ScriptedAdvisory::approving());
        let response = api
            .server
            .post("/api/v1/claims")
            .json(&json!({
                "member_id": api.members[1],
                "description": "Stolen side mirror",
                "amount": "-5"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_votes_approve_then_settle() {
        let api = api(ScriptedAdvisory::approving());
        let votes = format!("/api/v1/claims/{}/votes", api.open_claim);

        let first = api
            .server
            .post(&votes)
            .json(&json!({ "member_id": api.members[0], "choice": "approve" }))
            .await
            .json::<Value>();
        assert_eq!(first["recorded"], true);
        assert_eq!(first["claim"]["status"], "PENDING_VOTE");

        let repeat = api
            .server
            .post(&votes)
            .json(&json!({ "member_id": api.members[0], "choice": "deny" }))
            .await
            .json::<Value>();
        assert_eq!(repeat["recorded"], false);
        assert!(repeat["rejection"].is_string());

        let third = api
            .server
            .post(&votes)
            .json(&json!({ "member_id": api.members[2], "choice": "approve" }))
            .await
            .json::<Value>();
        assert_eq!(third["claim"]["status"], "APPROVED");

        let settlement = format!("/api/v1/claims/{}/settlement", api.open_claim);
        let payout = api.server.post(&settlement).await;
        payout.assert_status(StatusCode::CREATED);
        assert_eq!(payout.json::<Value>()["type"], "payout");

        api.server.post(&settlement).await.assert_status(StatusCode::CONFLICT);

        let balance = api.server.get("/api/v1/pool/balance").await.json::<Value>();
        assert_eq!(balance["display"], "KES 2,000");
    }

    #[tokio::test]
    async fn test_contribution() {
        let api = api(ScriptedAdvisory::approving());
        let response = api
            .server
            .post("/api/v1/contributions")
            .json(&json!({ "member_id": api.members[4], "amount": "750" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["type"], "contribution");
        assert_eq!(body["member_name"], "Peter Musyoka");

        let balance = api.server.get("/api/v1/pool/balance").await.json::<Value>();
        assert_eq!(balance["display"], "KES 3,250");
    }

    #[tokio::test]
    async fn test_contribution_refreshes_fund_health() {
        let api = api(ScriptedAdvisory::approving());
        api.server
            .post("/api/v1/contributions")
            .json(&json!({ "member_id": api.members[1], "amount": "400" }))
            .await
            .assert_status(StatusCode::CREATED);

        let mut status = Value::Null;
        for _ in 0..50 {
            let body = api.server.get("/api/v1/group").await.json::<Value>();
            status = body["fund_health"]["status"].clone();
            if body["fund_health"]["analysis"] != "Awaiting initial analysis..." {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(status, "Healthy");
    }

    #[tokio::test]
    async fn test_contribution_from_stranger_is_404() {
        let api = api(ScriptedAdvisory::approving());
        api.server
            .post("/api/v1/contributions")
            .json(&json!({ "member_id": "00000000-0000-0000-0000-00000000ffff", "amount": "750" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod ussd_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_menu_turns() {
        let api = api(ScriptedAdvisory::approving());
        let turn = |text: &'static str| {
            json!({ "session_id": "handset-1", "member_id": api.members[0], "text": text })
        };

        let first = api.server.post("/api/v1/ussd").json(&turn("")).await.json::<Value>();
        assert!(first["screen"].as_str().unwrap().starts_with("Welcome, James Kariuki."));
        assert_eq!(first["accepting_input"], true);

        let balance = api.server.post("/api/v1/ussd").json(&turn("1")).await.json::<Value>();
        assert!(balance["screen"]
            .as_str()
            .unwrap()
            .contains("Current pool balance is KES 2,500."));

        let contribute = api.server.post("/api/v1/ussd").json(&turn("4")).await.json::<Value>();
        assert!(contribute["screen"].as_str().unwrap().starts_with("Enter contribution amount (KES):"));

        api.server.delete("/api/v1/ussd/handset-1").await.assert_status(StatusCode::NO_CONTENT);
        api.server.delete("/api/v1/ussd/handset-1").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_session_rejected() {
        let api = api(ScriptedAdvisory::approving());
        api.server
            .post("/api/v1/ussd")
            .json(&json!({ "session_id": "", "member_id": api.members[0], "text": "1" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
