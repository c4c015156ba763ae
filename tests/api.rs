use std::time::Duration;

use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};
use uuid::Uuid;

use quill::{app, Config, State};

/// Caching is disabled by default so feed assertions observe writes
/// immediately; the cache test opts back in.
fn state() -> State {
	State::new(&Config {
		page_size: 10,
		feed_cache_ttl: Duration::ZERO,
	})
}

/// Each server carries its own cookie jar, so one `State` shared by several
/// servers acts as several logged-in users on one platform.
fn server(state: &State) -> TestServer {
	let config = TestServerConfig::builder().save_cookies().build();

	TestServer::new_with_config(app(state.clone()), config).unwrap()
}

async fn register(server: &TestServer, name: &str) {
	let response = server
		.post("/auth/register")
		.json(&json!({
			"email": format!("{name}@example.com"),
			"password": "correct horse battery",
			"username": name,
		}))
		.await;

	response.assert_status_ok();
}

async fn create_post(server: &TestServer, text: &str, group: Option<&str>) -> Value {
	let response = server
		.post("/posts")
		.json(&json!({ "text": text, "group": group }))
		.await;

	response.assert_status_ok();
	response.json()
}

async fn create_group(server: &TestServer, slug: &str) -> Value {
	let response = server
		.post("/groups")
		.json(&json!({
			"slug": slug,
			"title": slug.to_uppercase(),
			"description": "",
		}))
		.await;

	response.assert_status_ok();
	response.json()
}

#[tokio::test]
async fn test_register_login_me() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	let me: Value = ann.get("/auth/me").await.json();

	assert_eq!(me["username"], "ann");
	// Credentials never leave the server.
	assert!(me.get("email").is_none());
	assert!(me.get("password").is_none());

	let other = server(&state);

	other
		.get("/auth/me")
		.await
		.assert_status(StatusCode::UNAUTHORIZED);

	let response = other
		.post("/auth/login")
		.json(&json!({
			"email": "ann@example.com",
			"password": "correct horse battery",
		}))
		.await;

	response.assert_status_ok();

	let me: Value = other.get("/auth/me").await.json();

	assert_eq!(me["username"], "ann");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	server(&state)
		.post("/auth/login")
		.json(&json!({
			"email": "ann@example.com",
			"password": "not the password",
		}))
		.await
		.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	server(&state)
		.post("/auth/register")
		.json(&json!({
			"email": "ann@example.com",
			"password": "correct horse battery",
			"username": "other",
		}))
		.await
		.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_validation_rejects_bad_input() {
	let state = state();

	server(&state)
		.post("/auth/register")
		.json(&json!({
			"email": "not-an-email",
			"password": "short",
			"username": "ann",
		}))
		.await
		.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_writing_requires_session() {
	let state = state();
	let guest = server(&state);

	guest
		.post("/posts")
		.json(&json!({ "text": "hi" }))
		.await
		.assert_status(StatusCode::UNAUTHORIZED);

	guest
		.get("/posts/following")
		.await
		.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_global_feed_pagination() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	for index in 0..13 {
		create_post(&ann, &format!("post {index}"), None).await;
	}

	let first: Value = ann.get("/posts").await.json();

	assert_eq!(first["items"].as_array().unwrap().len(), 10);
	assert_eq!(first["items"][0]["text"], "post 12");
	assert_eq!(first["total_items"], 13);
	assert_eq!(first["total_pages"], 2);
	assert_eq!(first["has_next"], true);
	assert_eq!(first["has_previous"], false);

	let second: Value = ann
		.get("/posts")
		.add_query_param("page", 2)
		.await
		.json();

	assert_eq!(second["items"].as_array().unwrap().len(), 3);
	assert_eq!(second["has_next"], false);
	assert_eq!(second["has_previous"], true);

	// Out-of-range pages clamp to the last page instead of failing.
	let clamped: Value = ann
		.get("/posts")
		.add_query_param("page", 5)
		.await
		.json();

	assert_eq!(clamped["number"], 2);
	assert_eq!(clamped["items"], second["items"]);

	// Malformed page numbers fall back to the first page.
	let fallback: Value = ann
		.get("/posts")
		.add_query_param("page", "abc")
		.await
		.json();

	assert_eq!(fallback["number"], 1);
}

#[tokio::test]
async fn test_group_feed_is_scoped() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	let cats = create_group(&ann, "cats").await;

	create_group(&ann, "dogs").await;
	create_post(&ann, "meow", cats["id"].as_str()).await;
	create_post(&ann, "untagged", None).await;

	let page: Value = ann.get("/groups/cats/posts").await.json();

	assert_eq!(page["items"].as_array().unwrap().len(), 1);
	assert_eq!(page["items"][0]["text"], "meow");

	// A group with no posts is an empty page, not an error.
	let empty: Value = ann.get("/groups/dogs/posts").await.json();

	assert_eq!(empty["items"].as_array().unwrap().len(), 0);
	assert_eq!(empty["total_items"], 0);

	ann.get("/groups/unknown/posts")
		.await
		.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_slug_must_be_url_safe() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	ann.post("/groups")
		.json(&json!({
			"slug": "no spaces",
			"title": "Nope",
			"description": "",
		}))
		.await
		.assert_status(StatusCode::BAD_REQUEST);

	create_group(&ann, "cats").await;

	ann.post("/groups")
		.json(&json!({
			"slug": "cats",
			"title": "Cats again",
			"description": "",
		}))
		.await
		.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleting_group_detaches_posts() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	let cats = create_group(&ann, "cats").await;
	let post = create_post(&ann, "meow", cats["id"].as_str()).await;

	ann.delete("/groups/cats").await.assert_status_ok();

	let post: Value = ann
		.get(&format!("/posts/{}", post["id"].as_str().unwrap()))
		.await
		.json();

	assert_eq!(post["group_id"], Value::Null);
	assert_eq!(post["text"], "meow");
}

#[tokio::test]
async fn test_profile_feed_and_stats() {
	let state = state();
	let ann = server(&state);
	let bob = server(&state);

	register(&ann, "ann").await;
	register(&bob, "bob").await;

	create_post(&ann, "from ann", None).await;
	create_post(&bob, "from bob", None).await;

	let page: Value = ann.get("/users/ann/posts").await.json();

	assert_eq!(page["items"].as_array().unwrap().len(), 1);
	assert_eq!(page["items"][0]["text"], "from ann");

	ann.get("/users/nobody/posts")
		.await
		.assert_status(StatusCode::NOT_FOUND);

	bob.post("/users/ann/follow").await.assert_status_ok();

	let profile: Value = bob.get("/users/ann").await.json();

	assert_eq!(profile["username"], "ann");
	assert_eq!(profile["stats"]["posts"], 1);
	assert_eq!(profile["stats"]["followers"], 1);
	assert_eq!(profile["stats"]["following"], 0);
}

#[tokio::test]
async fn test_follow_feed() {
	let state = state();
	let ann = server(&state);
	let bob = server(&state);
	let kim = server(&state);

	register(&ann, "ann").await;
	register(&bob, "bob").await;
	register(&kim, "kim").await;

	create_post(&bob, "from bob", None).await;
	create_post(&kim, "from kim", None).await;

	ann.post("/users/bob/follow").await.assert_status_ok();

	let page: Value = ann.get("/posts/following").await.json();
	let items = page["items"].as_array().unwrap();

	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["text"], "from bob");

	// The follow edge is unique.
	ann.post("/users/bob/follow")
		.await
		.assert_status(StatusCode::CONFLICT);

	ann.delete("/users/bob/follow").await.assert_status_ok();

	let page: Value = ann.get("/posts/following").await.json();

	assert_eq!(page["items"].as_array().unwrap().len(), 0);

	ann.delete("/users/bob/follow")
		.await
		.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_comments() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	let post = create_post(&ann, "hello", None).await;
	let path = format!("/posts/{}/comments", post["id"].as_str().unwrap());

	ann.post(&path)
		.json(&json!({ "text": "first" }))
		.await
		.assert_status_ok();
	ann.post(&path)
		.json(&json!({ "text": "second" }))
		.await
		.assert_status_ok();

	let comments: Value = ann.get(&path).await.json();
	let comments = comments.as_array().unwrap().clone();

	assert_eq!(comments.len(), 2);
	assert_eq!(comments[0]["text"], "first");
	assert_eq!(comments[1]["text"], "second");

	ann.get(&format!("/posts/{}/comments", Uuid::new_v4()))
		.await
		.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_the_author_can_modify_a_post() {
	let state = state();
	let ann = server(&state);
	let bob = server(&state);

	register(&ann, "ann").await;
	register(&bob, "bob").await;

	let post = create_post(&ann, "mine", None).await;
	let path = format!("/posts/{}", post["id"].as_str().unwrap());

	bob.put(&path)
		.json(&json!({ "text": "stolen" }))
		.await
		.assert_status(StatusCode::NOT_FOUND);
	bob.delete(&path).await.assert_status(StatusCode::NOT_FOUND);

	let response = ann.put(&path).json(&json!({ "text": "edited" })).await;

	response.assert_status_ok();
	assert_eq!(response.json::<Value>()["text"], "edited");
}

#[tokio::test]
async fn test_update_clears_group_only_on_explicit_null() {
	let state = state();
	let ann = server(&state);

	register(&ann, "ann").await;

	let cats = create_group(&ann, "cats").await;
	let post = create_post(&ann, "meow", cats["id"].as_str()).await;
	let path = format!("/posts/{}", post["id"].as_str().unwrap());

	// Omitting the field keeps the group.
	let kept: Value = ann.put(&path).json(&json!({ "text": "edited" })).await.json();

	assert_eq!(kept["group_id"], cats["id"]);

	// An explicit null detaches the post from its group.
	let cleared: Value = ann.put(&path).json(&json!({ "group": null })).await.json();

	assert_eq!(cleared["group_id"], Value::Null);
	assert_eq!(cleared["text"], "edited");
}

#[tokio::test]
async fn test_deleting_account_cascades() {
	let state = state();
	let ann = server(&state);
	let bob = server(&state);

	register(&ann, "ann").await;
	register(&bob, "bob").await;

	create_post(&ann, "from ann", None).await;
	bob.post("/users/ann/follow").await.assert_status_ok();

	ann.delete("/auth/me").await.assert_status_ok();

	let feed: Value = bob.get("/posts").await.json();

	assert_eq!(feed["items"].as_array().unwrap().len(), 0);

	bob.get("/users/ann")
		.await
		.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_global_feed_is_cached_within_the_window() {
	let state = State::new(&Config {
		page_size: 10,
		feed_cache_ttl: Duration::from_secs(60),
	});
	let ann = server(&state);

	register(&ann, "ann").await;

	let before: Value = ann.get("/posts").await.json();

	assert_eq!(before["total_items"], 0);

	create_post(&ann, "too fresh for the cache", None).await;

	// Within the window the cached page is served unchanged.
	let after: Value = ann.get("/posts").await.json();

	assert_eq!(after["total_items"], 0);
}
