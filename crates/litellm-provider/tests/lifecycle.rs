use litellm_client::{LitellmClient, ProviderConfig};
use litellm_provider::{Provider, ResourceData, Severity};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

async fn configured(server: &Server) -> (Provider, Arc<LitellmClient>) {
    let provider = Provider::new();
    let config = ProviderConfig::new(server.url()).with_api_token("sk-test");
    let client = provider.configure(&config).await.unwrap();
    (provider, client)
}

fn model_config() -> ResourceData {
    ResourceData::from_value(json!({
        "model_name": "test-model",
        "model_info_id": "unique-model-id",
        "model_info_base_model": "gpt-3.5-turbo",
        "model_info_tier": "paid",
        "litellm_params_model": "gpt-3.5-turbo",
        "litellm_params_api_key": "sk-upstream",
        "litellm_params_tpm": 1000
    }))
    .unwrap()
}

#[tokio::test]
async fn test_model_create_read_roundtrip() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/model/new")
        .match_header("authorization", "Bearer sk-test")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model_name": "test-model",
            "model_info": {"id": "unique-model-id", "db_model": true, "tier": "paid"},
            "litellm_params": {"model": "gpt-3.5-turbo", "tpm": 1000}
        })))
        .with_status(200)
        .with_body(r#"{"model_id": "unique-model-id"}"#)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/model/info")
        .match_query(Matcher::UrlEncoded(
            "litellm_model_id".into(),
            "unique-model-id".into(),
        ))
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "model_name": "test-model",
                    "model_info": {
                        "id": "unique-model-id",
                        "db_model": true,
                        "base_model": "gpt-3.5-turbo",
                        "tier": "paid",
                        "created_at": "2024-10-01T00:00:00Z"
                    },
                    "litellm_params": {
                        "model": "gpt-3.5-turbo",
                        "api_key": "sk-upstream",
                        "tpm": 1000
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = model_config();

    let diags = provider.create(&client, "litellm_model", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("unique-model-id"));

    let diags = provider.read(&client, "litellm_model", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");

    assert_eq!(data.id(), Some("unique-model-id"));
    assert_eq!(data.string("model_name").as_deref(), Some("test-model"));
    assert_eq!(data.string("model_info_base_model").as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(data.string("model_info_tier").as_deref(), Some("paid"));
    assert_eq!(data.bool("model_info_db_model"), Some(true));
    assert_eq!(data.string("litellm_params_model").as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(data.string("litellm_params_api_key").as_deref(), Some("sk-upstream"));
    assert_eq!(data.int("litellm_params_tpm"), Some(1000));
    assert_eq!(
        data.string("model_info_created_at").as_deref(),
        Some("2024-10-01T00:00:00Z")
    );

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test]
async fn test_model_update_and_delete() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("POST", "/model/update")
        .match_body(Matcher::PartialJson(json!({
            "model_info": {"id": "unique-model-id", "tier": "free"}
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/model/delete")
        .match_body(Matcher::Json(json!({"id": "unique-model-id"})))
        .with_status(200)
        .with_body(r#"{"message": "deleted"}"#)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = model_config().with("model_info_tier", "free");
    data.set_id("unique-model-id");

    let diags = provider.update(&client, "litellm_model", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("unique-model-id"));

    let diags = provider.delete(&client, "litellm_model", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), None);

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_failed_delete_keeps_id() {
    let mut server = Server::new_async().await;
    let _delete = server
        .mock("POST", "/team/delete")
        .match_body(Matcher::Json(json!({"team_ids": ["team-1"]})))
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new().with("team_id", "team-1");
    data.set_id("team-1");

    let diags = provider.delete(&client, "litellm_team", &mut data).await;
    assert!(diags.has_errors());
    assert!(diags.iter().next().unwrap().detail.contains("500"));
    assert_eq!(data.id(), Some("team-1"));
}

#[tokio::test]
async fn test_failed_create_leaves_id_unset() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/model/new")
        .with_status(400)
        .with_body(r#"{"error": "bad request"}"#)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = model_config();

    let diags = provider.create(&client, "litellm_model", &mut data).await;
    assert!(diags.has_errors());
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_read_decode_failure_leaves_state_untouched() {
    let mut server = Server::new_async().await;
    let _read = server
        .mock("GET", "/model/info")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = model_config();
    data.set_id("unique-model-id");
    let before = data.clone();

    let diags = provider.read(&client, "litellm_model", &mut data).await;
    assert!(diags.has_errors());
    assert_eq!(diags.iter().next().unwrap().summary, "Failed to decode LiteLLM response");
    assert_eq!(data, before);
}

#[tokio::test]
async fn test_invalid_user_role_never_reaches_the_api() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/user/new")
        .expect(0)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("user_id", "u-1")
        .with("user_role", "not_a_role");

    let diags = provider.create(&client, "litellm_user", &mut data).await;
    assert!(diags.has_errors());
    assert!(diags
        .iter()
        .any(|d| d.detail == "not_a_role is not a valid role"));
    assert_eq!(data.id(), None);

    create.assert_async().await;
}

#[tokio::test]
async fn test_user_create_adopts_server_id() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/user/new")
        .match_body(Matcher::PartialJson(json!({
            "user_email": "alice@example.com",
            "user_role": "proxy_admin",
            "auto_create_key": true
        })))
        .with_status(200)
        .with_body(r#"{"user_id": "generated-id", "key": "sk-new"}"#)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("user_email", "alice@example.com")
        .with("user_role", "proxy_admin");

    let diags = provider.create(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("generated-id"));

    create.assert_async().await;
}

#[tokio::test]
async fn test_membership_lifecycle() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/team/member_add")
        .match_body(Matcher::Json(json!({
            "member": [{"role": "admin", "user_id": "bob"}],
            "team_id": "team-1"
        })))
        .with_status(200)
        .with_body(r#"{"team_id": "team-1"}"#)
        .create_async()
        .await;
    let info = server
        .mock("GET", "/team/info")
        .match_query(Matcher::UrlEncoded("team_id".into(), "team-1".into()))
        .with_status(200)
        .with_body(
            json!({
                "team_id": "team-1",
                "team_info": {
                    "team_alias": "ops",
                    "members_with_roles": [
                        {"role": "user", "user_id": "alice"},
                        {"role": "admin", "user_id": "bob"}
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let remove = server
        .mock("POST", "/team/member_delete")
        .match_body(Matcher::Json(json!({"user_id": "bob", "team_id": "team-1"})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("team_id", "team-1")
        .with("user_id", "bob")
        .with("role", "admin");

    let diags = provider.create(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("team-1_bob"));

    let diags = provider.read(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.string("role").as_deref(), Some("admin"));

    let diags = provider.update(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.has_errors());
    assert_eq!(diags.iter().next().unwrap().summary, "Update not supported");

    let diags = provider.delete(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), None);

    add.assert_async().await;
    info.assert_async().await;
    remove.assert_async().await;
}

#[tokio::test]
async fn test_membership_gone_clears_id() {
    let mut server = Server::new_async().await;
    let _info = server
        .mock("GET", "/team/info")
        .match_query(Matcher::UrlEncoded("team_id".into(), "team-1".into()))
        .with_status(200)
        .with_body(r#"{"team_id": "team-1", "team_info": {"members_with_roles": []}}"#)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("team_id", "team-1")
        .with("user_id", "bob")
        .with("role", "user");
    data.set_id("team-1_bob");

    let diags = provider.read(&client, "litellm_team_membership", &mut data).await;
    assert!(!diags.has_errors());
    assert_eq!(diags.iter().next().unwrap().severity, Severity::Warning);
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_membership_role_rejected_before_create() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/team/member_add")
        .expect(0)
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("team_id", "team-1")
        .with("user_id", "bob")
        .with("role", "proxy_admin");

    let diags = provider.create(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.has_errors());
    assert_eq!(data.id(), None);

    add.assert_async().await;
}

#[tokio::test]
async fn test_import_membership() {
    let mut server = Server::new_async().await;
    let _info = server
        .mock("GET", "/team/info")
        .match_query(Matcher::UrlEncoded("team_id".into(), "team-1".into()))
        .with_status(200)
        .with_body(
            json!({
                "team_id": "team-1",
                "team_info": {"members_with_roles": [{"role": "user", "user_id": "bob"}]}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let data = provider
        .import(&client, "litellm_team_membership", "team-1_bob")
        .await
        .unwrap();

    assert_eq!(data.id(), Some("team-1_bob"));
    assert_eq!(data.string("role").as_deref(), Some("user"));
}

#[tokio::test]
async fn test_model_data_source() {
    let mut server = Server::new_async().await;
    let _info = server
        .mock("GET", "/model/info")
        .match_query(Matcher::UrlEncoded(
            "litellm_model_id".into(),
            "unique-model-id".into(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "model_name": "test-model",
                    "model_info": {"id": "unique-model-id", "tier": "paid"},
                    "litellm_params": {"model": "gpt-3.5-turbo"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new().with("model_info_id", "unique-model-id");

    let diags = provider.read_data_source(&client, "litellm_model", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("unique-model-id"));
    assert_eq!(data.string("model_name").as_deref(), Some("test-model"));
    assert_eq!(data.string("model_info_tier").as_deref(), Some("paid"));
}

#[tokio::test]
async fn test_jwt_configuration_drives_api_calls() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/oauth2/token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "client_id": "terraform",
            "client_secret": "s3cret",
            "grant_type": "client_credentials"
        })))
        .with_status(200)
        .with_body(r#"{"id_token": "jwt-123"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/user/delete")
        .match_header("authorization", "Bearer jwt-123")
        .match_body(Matcher::Json(json!({"user_ids": ["u-1"]})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let provider = Provider::new();
    let config = ProviderConfig::from_value(json!({
        "api_base_url": server.url(),
        "jwt_token_endpoint": format!("{}/oauth2/token", server.url()),
        "jwt_request_header": {"Content-Type": "application/json"},
        "jwt_request_payload": {
            "client_id": "terraform",
            "client_secret": "s3cret",
            "grant_type": "client_credentials"
        },
        "jwt_token_attribute": "id_token"
    }))
    .unwrap();
    let client = provider.configure(&config).await.unwrap();

    let mut data = ResourceData::new().with("user_id", "u-1");
    data.set_id("u-1");
    let diags = provider.delete(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");

    token.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_user_create_read_roundtrip() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/user/new")
        .match_body(Matcher::PartialJson(json!({
            "user_id": "alice",
            "user_alias": "Alice",
            "user_email": "alice@example.com",
            "user_role": "internal_user",
            "models": ["gpt-4o"],
            "max_budget": 25.5,
            "metadata": {"team": "ml"}
        })))
        .with_status(200)
        .with_body(r#"{"user_id": "alice", "key": "sk-new"}"#)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/user/info")
        .match_query(Matcher::UrlEncoded("user_id".into(), "alice".into()))
        .with_status(200)
        .with_body(
            json!({
                "user_id": "alice",
                "user_info": {
                    "user_id": "alice",
                    "user_alias": "Alice",
                    "user_email": "alice@example.com",
                    "user_role": "internal_user",
                    "models": ["gpt-4o"],
                    "max_budget": 25.5,
                    "tpm_limit": 500,
                    "auto_create_key": true,
                    "metadata": {"team": "ml"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::from_value(json!({
        "user_id": "alice",
        "user_alias": "Alice",
        "user_email": "alice@example.com",
        "user_role": "internal_user",
        "models": ["gpt-4o"],
        "max_budget": 25.5,
        "metadata": {"team": "ml"}
    }))
    .unwrap();

    let diags = provider.create(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("alice"));

    let diags = provider.read(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");

    assert_eq!(data.id(), Some("alice"));
    assert_eq!(data.string("user_alias").as_deref(), Some("Alice"));
    assert_eq!(data.string("user_email").as_deref(), Some("alice@example.com"));
    assert_eq!(data.string("user_role").as_deref(), Some("internal_user"));
    assert_eq!(data.string_list("models"), vec!["gpt-4o"]);
    assert_eq!(data.float("max_budget"), Some(25.5));
    assert_eq!(data.int("tpm_limit"), Some(500));
    assert_eq!(data.bool("auto_create_key"), Some(true));
    assert_eq!(data.string_map("metadata")["team"], "ml");

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test]
async fn test_user_update_after_server_assigned_id() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/user/new")
        .with_status(200)
        .with_body(r#"{"user_id": "generated-id"}"#)
        .create_async()
        .await;
    let update = server
        .mock("POST", "/user/update")
        .match_body(Matcher::PartialJson(json!({
            "user_id": "generated-id",
            "user_email": "b@example.com"
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new().with("user_email", "a@example.com");

    let diags = provider.create(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("generated-id"));

    data.set("user_email", "b@example.com");
    let diags = provider.update(&client, "litellm_user", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");

    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_team_create_read_roundtrip() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/team/new")
        .match_body(Matcher::PartialJson(json!({
            "team_alias": "platform",
            "models": ["gpt-4o"],
            "tpm_limit": 1000,
            "blocked": true,
            "metadata": {"owner": "ops"}
        })))
        .with_status(200)
        .with_body(r#"{"team_id": "team-9"}"#)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/team/info")
        .match_query(Matcher::UrlEncoded("team_id".into(), "team-9".into()))
        .with_status(200)
        .with_body(
            json!({
                "team_id": "team-9",
                "team_info": {
                    "team_id": "team-9",
                    "team_alias": "platform",
                    "models": ["gpt-4o"],
                    "tpm_limit": 1000,
                    "max_budget": 100.0,
                    "budget_duration": "30d",
                    "blocked": true,
                    "metadata": {"owner": "ops"},
                    "members_with_roles": [
                        {"role": "org_admin", "user_id": "x"},
                        {"user_id": "y"}
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::from_value(json!({
        "team_alias": "platform",
        "models": ["gpt-4o"],
        "tpm_limit": 1000,
        "blocked": true,
        "metadata": {"owner": "ops"}
    }))
    .unwrap();

    let diags = provider.create(&client, "litellm_team", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.id(), Some("team-9"));

    let diags = provider.read(&client, "litellm_team", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");

    assert_eq!(data.string("team_id").as_deref(), Some("team-9"));
    assert_eq!(data.string("team_alias").as_deref(), Some("platform"));
    assert_eq!(data.string_list("models"), vec!["gpt-4o"]);
    assert_eq!(data.int("tpm_limit"), Some(1000));
    assert_eq!(data.float("max_budget"), Some(100.0));
    assert_eq!(data.string("budget_duration").as_deref(), Some("30d"));
    assert_eq!(data.bool("blocked"), Some(true));
    assert_eq!(data.string_map("metadata")["owner"], "ops");

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test]
async fn test_membership_read_ignores_foreign_roles_of_other_members() {
    let mut server = Server::new_async().await;
    let _info = server
        .mock("GET", "/team/info")
        .match_query(Matcher::UrlEncoded("team_id".into(), "team-1".into()))
        .with_status(200)
        .with_body(
            json!({
                "team_id": "team-1",
                "team_info": {
                    "members_with_roles": [
                        {"role": "org_admin", "user_id": "x"},
                        {"role": "admin", "user_id": "bob"}
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, client) = configured(&server).await;
    let mut data = ResourceData::new()
        .with("team_id", "team-1")
        .with("user_id", "bob")
        .with("role", "admin");
    data.set_id("team-1_bob");

    let diags = provider.read(&client, "litellm_team_membership", &mut data).await;
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(data.string("role").as_deref(), Some("admin"));
}
