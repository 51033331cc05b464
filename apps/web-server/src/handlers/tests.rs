use std::io::Cursor;
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;
use uuid::Uuid;

use yatube_core::domain::{Group, NewGroup, NewPost, Post, PostFilter, User};
use yatube_core::forms::{INVALID_CHOICE, INVALID_EMAIL, ImageUpload, PostForm, REQUIRED};
use yatube_core::ports::{
    BaseRepository, GroupRepository, ImageStore, PostRepository, UserRepository,
};
use yatube_infra::{InMemoryImageStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use super::posts::{
    PageQuery, create_post, editable_post, group_posts, index, post_detail, profile, update_post,
};
use crate::config::default_template_dir;
use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, Identity};
use crate::middleware::error::{AppError, error_pages};
use crate::render::{Templates, View};
use crate::state::AppState;

struct Fixture {
    state: AppState,
    images: Arc<InMemoryImageStore>,
}

fn fixture() -> Fixture {
    let images = Arc::new(InMemoryImageStore::default());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
    Fixture {
        state: AppState::in_memory(images.clone(), tokens),
        images,
    }
}

async fn user(state: &AppState, username: &str) -> Identity {
    let user = state
        .users
        .create(User::new(
            username.to_string(),
            String::new(),
            "unused-hash".to_string(),
        ))
        .await
        .unwrap();
    Identity {
        user_id: user.id,
        username: user.username,
    }
}

async fn group(state: &AppState, title: &str, slug: &str) -> Group {
    state
        .groups
        .create(NewGroup::new(title, Some(slug), "Test description").unwrap())
        .await
        .unwrap()
}

async fn post(state: &AppState, author: &Identity, text: &str, group_id: Option<i64>) -> Post {
    state
        .posts
        .create(NewPost {
            text: text.to_string(),
            author_id: author.user_id,
            group_id,
            image: None,
        })
        .await
        .unwrap()
}

fn page(page: &str) -> web::Query<PageQuery> {
    web::Query(PageQuery {
        page: Some(page.to_string()),
    })
}

fn no_page() -> web::Query<PageQuery> {
    web::Query(PageQuery::default())
}

fn ctx(view: &View, key: &str) -> Value {
    view.context()
        .and_then(|c| c.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 200, 10]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn text_form(text: &str, group: Option<i64>) -> PostForm {
    PostForm {
        text: text.to_string(),
        group: group.map(|id| id.to_string()),
        ..Default::default()
    }
}

#[actix_web::test]
async fn test_index_paginates_by_ten() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    for i in 0..11 {
        post(&f.state, &author, &format!("Post {i}"), None).await;
    }
    let data = web::Data::new(f.state.clone());

    let first = index(data.clone(), no_page()).await.unwrap();
    assert_eq!(first.template(), Some("posts/index.html"));
    let page_obj = ctx(&first, "page_obj");
    assert_eq!(page_obj["object_list"].as_array().unwrap().len(), 10);
    assert_eq!(page_obj["number"], 1);
    assert_eq!(page_obj["has_next"], true);
    // Newest first
    assert_eq!(page_obj["object_list"][0]["text"], "Post 10");
    assert_eq!(page_obj["object_list"][0]["author"]["username"], "auth");

    let second = index(data.clone(), page("2")).await.unwrap();
    let page_obj = ctx(&second, "page_obj");
    assert_eq!(page_obj["object_list"].as_array().unwrap().len(), 1);
    assert_eq!(page_obj["object_list"][0]["text"], "Post 0");
}

#[actix_web::test]
async fn test_bad_page_numbers_clamp() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    for i in 0..11 {
        post(&f.state, &author, &format!("Post {i}"), None).await;
    }
    let data = web::Data::new(f.state.clone());

    let garbage = index(data.clone(), page("abc")).await.unwrap();
    assert_eq!(ctx(&garbage, "page_obj")["number"], 1);

    let beyond = index(data.clone(), page("99")).await.unwrap();
    let page_obj = ctx(&beyond, "page_obj");
    assert_eq!(page_obj["number"], 2);
    assert_eq!(page_obj["object_list"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_empty_index_is_single_empty_page() {
    let f = fixture();
    let view = index(web::Data::new(f.state.clone()), no_page())
        .await
        .unwrap();

    let page_obj = ctx(&view, "page_obj");
    assert_eq!(page_obj["count"], 0);
    assert_eq!(page_obj["num_pages"], 1);
    assert!(page_obj["object_list"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_group_page_lists_only_its_posts() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let cats = group(&f.state, "Cats", "cats").await;
    let dogs = group(&f.state, "Dogs", "dogs").await;
    post(&f.state, &author, "About cats", Some(cats.id)).await;
    post(&f.state, &author, "About dogs", Some(dogs.id)).await;
    post(&f.state, &author, "About nothing", None).await;

    let view = group_posts(
        web::Data::new(f.state.clone()),
        web::Path::from("cats".to_string()),
        no_page(),
    )
    .await
    .unwrap();

    assert_eq!(view.template(), Some("posts/group_list.html"));
    assert_eq!(ctx(&view, "group")["title"], "Cats");
    let posts = ctx(&view, "page_obj")["object_list"].clone();
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["text"], "About cats");
    assert_eq!(posts[0]["group"]["slug"], "cats");
}

#[actix_web::test]
async fn test_unknown_group_is_not_found() {
    let f = fixture();
    let result = group_posts(
        web::Data::new(f.state.clone()),
        web::Path::from("missing".to_string()),
        no_page(),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_profile_counts_author_posts() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let other = user(&f.state, "other").await;
    for i in 0..3 {
        post(&f.state, &author, &format!("Mine {i}"), None).await;
    }
    post(&f.state, &other, "Not mine", None).await;

    let view = profile(
        web::Data::new(f.state.clone()),
        web::Path::from("auth".to_string()),
        no_page(),
    )
    .await
    .unwrap();

    assert_eq!(view.template(), Some("posts/profile.html"));
    assert_eq!(ctx(&view, "author")["username"], "auth");
    assert_eq!(ctx(&view, "post_count"), 3);
    let posts = ctx(&view, "page_obj")["object_list"].clone();
    assert!(
        posts
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["author"]["username"] == "auth")
    );

    let missing = profile(
        web::Data::new(f.state.clone()),
        web::Path::from("nobody".to_string()),
        no_page(),
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_post_detail_shows_post_and_author_count() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let cats = group(&f.state, "Cats", "cats").await;
    post(&f.state, &author, "First", None).await;
    let target = post(&f.state, &author, "Second", Some(cats.id)).await;

    let data = web::Data::new(f.state.clone());
    let view = post_detail(data.clone(), web::Path::from(target.id))
        .await
        .unwrap();

    assert_eq!(view.template(), Some("posts/post_detail.html"));
    assert_eq!(ctx(&view, "post")["text"], "Second");
    assert_eq!(ctx(&view, "post")["group"]["title"], "Cats");
    assert_eq!(ctx(&view, "post_count"), 2);

    let missing = post_detail(data, web::Path::from(9999)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_valid_create_adds_post_and_redirects_to_profile() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let cats = group(&f.state, "Cats", "cats").await;

    let view = create_post(&f.state, &author, text_form("Fresh post", Some(cats.id)))
        .await
        .unwrap();

    assert_eq!(view.location(), Some("/profile/auth/"));
    assert_eq!(f.state.posts.count(PostFilter::All).await.unwrap(), 1);
    let created = f.state.posts.list(PostFilter::All, 0, 1).await.unwrap();
    assert_eq!(created[0].text, "Fresh post");
    assert_eq!(created[0].author_id, author.user_id);
    assert_eq!(created[0].group_id, Some(cats.id));
}

#[actix_web::test]
async fn test_invalid_create_rerenders_form() {
    let f = fixture();
    let author = user(&f.state, "auth").await;

    let view = create_post(
        &f.state,
        &author,
        PostForm {
            text: "   ".to_string(),
            group: Some("42".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(view.template(), Some("posts/post_create.html"));
    let form = ctx(&view, "form");
    assert_eq!(form["errors"]["text"][0], REQUIRED);
    assert_eq!(form["errors"]["group"][0], INVALID_CHOICE);
    assert_eq!(ctx(&view, "is_edit"), false);
    assert_eq!(f.state.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_with_image_stores_file() {
    let f = fixture();
    let author = user(&f.state, "auth").await;

    let form = PostForm {
        text: "With picture".to_string(),
        image: Some(ImageUpload {
            filename: "small.png".to_string(),
            bytes: png_bytes(),
        }),
        ..Default::default()
    };
    create_post(&f.state, &author, form).await.unwrap();

    assert_eq!(f.images.len().await, 1);
    let created = f.state.posts.list(PostFilter::All, 0, 1).await.unwrap();
    let name = created[0].image.clone().unwrap();
    assert!(name.starts_with("posts/") && name.ends_with(".png"));
    assert_eq!(f.images.open(&name).await.unwrap(), Some(png_bytes()));

    let view = post_detail(web::Data::new(f.state.clone()), web::Path::from(created[0].id))
        .await
        .unwrap();
    assert_eq!(ctx(&view, "post")["image_url"], format!("/media/{name}"));
}

#[actix_web::test]
async fn test_failed_create_discards_uploaded_image() {
    let f = fixture();
    let ghost = Identity {
        user_id: Uuid::new_v4(),
        username: "ghost".to_string(),
    };

    let form = PostForm {
        text: "Nobody wrote this".to_string(),
        image: Some(ImageUpload {
            filename: "small.png".to_string(),
            bytes: png_bytes(),
        }),
        ..Default::default()
    };
    let result = create_post(&f.state, &ghost, form).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(f.images.len().await, 0);
    assert_eq!(f.state.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_failed_edit_discards_uploaded_image() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let target = post(&f.state, &author, "Soon gone", None).await;
    f.state.posts.delete(target.id).await.unwrap();

    let form = PostForm {
        image: Some(ImageUpload {
            filename: "small.png".to_string(),
            bytes: png_bytes(),
        }),
        ..text_form("Too late", None)
    };
    let result = update_post(&f.state, target, form).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(f.images.len().await, 0);
}

#[actix_web::test]
async fn test_author_edit_updates_in_place() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let cats = group(&f.state, "Cats", "cats").await;
    let original = post(&f.state, &author, "Before", None).await;

    let target = editable_post(&f.state, &author, original.id)
        .await
        .unwrap()
        .unwrap();
    let view = update_post(&f.state, target, text_form("After", Some(cats.id)))
        .await
        .unwrap();

    assert_eq!(view.location(), Some(format!("/posts/{}/", original.id).as_str()));
    assert_eq!(f.state.posts.count(PostFilter::All).await.unwrap(), 1);
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "After");
    assert_eq!(stored.group_id, Some(cats.id));
    assert_eq!(stored.author_id, author.user_id);
    assert_eq!(stored.pub_date, original.pub_date);
}

#[actix_web::test]
async fn test_non_author_edit_is_redirected_without_changes() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let intruder = user(&f.state, "intruder").await;
    let original = post(&f.state, &author, "Untouched", None).await;

    let denied = editable_post(&f.state, &intruder, original.id)
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(
        denied.location(),
        Some(format!("/posts/{}/", original.id).as_str())
    );
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
}

#[actix_web::test]
async fn test_invalid_edit_keeps_post() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let original = post(&f.state, &author, "Keep me", None).await;

    let view = update_post(&f.state, original.clone(), text_form("", None))
        .await
        .unwrap();

    assert_eq!(view.template(), Some("posts/post_create.html"));
    assert_eq!(ctx(&view, "is_edit"), true);
    assert_eq!(ctx(&view, "post_id"), original.id);
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Keep me");
}

#[actix_web::test]
async fn test_edit_without_upload_keeps_image_and_clear_drops_it() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let name = f.images.save("png", &png_bytes()).await.unwrap();
    let original = f
        .state
        .posts
        .create(NewPost {
            text: "Pictured".to_string(),
            author_id: author.user_id,
            group_id: None,
            image: Some(name.clone()),
        })
        .await
        .unwrap();

    update_post(&f.state, original.clone(), text_form("Still pictured", None))
        .await
        .unwrap();
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.image.as_deref(), Some(name.as_str()));

    let clear = PostForm {
        image_clear: true,
        ..text_form("No picture", None)
    };
    update_post(&f.state, stored, clear).await.unwrap();
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.image, None);
    assert_eq!(f.images.len().await, 0);
}

#[actix_web::test]
async fn test_group_removal_keeps_posts() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let cats = group(&f.state, "Cats", "cats").await;
    let target = post(&f.state, &author, "Orphaned", Some(cats.id)).await;

    f.state.groups.delete(cats.id).await.unwrap();

    let view = post_detail(web::Data::new(f.state.clone()), web::Path::from(target.id))
        .await
        .unwrap();
    assert!(ctx(&view, "post")["group"].is_null());
}

// Full request cycle through routing, extractors and templates.

fn templates() -> web::Data<Templates> {
    web::Data::new(Templates::load(&default_template_dir()).unwrap())
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(error_pages())
                .app_data(web::Data::new($state.clone()))
                .app_data(templates())
                .configure(configure_routes),
        )
        .await
    };
}

fn session(state: &AppState, identity: &Identity) -> (String, String) {
    let token = state
        .tokens
        .generate_token(identity.user_id, &identity.username, vec![])
        .unwrap();
    (ACCESS_TOKEN_COOKIE.to_string(), token)
}

fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_web::test]
async fn test_pages_render() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    group(&f.state, "Cats", "cats").await;
    let target = post(&f.state, &author, "Rendered post", None).await;
    let app = app!(f.state);

    for uri in [
        "/".to_string(),
        "/group/cats/".to_string(),
        "/profile/auth/".to_string(),
        format!("/posts/{}/", target.id),
        "/auth/login/".to_string(),
        "/auth/signup/".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Rendered post"));
    assert!(html.contains("href=\"/profile/auth/\""));
    assert!(html.contains(&format!("href=\"/posts/{}/\"", target.id)));
}

#[actix_web::test]
async fn test_unknown_pages_are_not_found() {
    let f = fixture();
    let app = app!(f.state);

    for uri in ["/unexisting_page/", "/group/missing/", "/posts/9999/", "/posts/abc/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let req = test::TestRequest::get().uri("/unexisting_page/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Page not found"));
}

#[actix_web::test]
async fn test_anonymous_is_sent_to_login() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let target = post(&f.state, &author, "Text", None).await;
    let app = app!(f.state);

    let req = test::TestRequest::get().uri("/create/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=%2Fcreate%2F");

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", target.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("/auth/login/?next="));
}

#[actix_web::test]
async fn test_authorized_pages_render() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let target = post(&f.state, &author, "Mine", None).await;
    let app = app!(f.state);

    for uri in ["/create/".to_string(), format!("/posts/{}/edit/", target.id)] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(actix_web::cookie::Cookie::new(
                ACCESS_TOKEN_COOKIE,
                session(&f.state, &author).1,
            ))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_non_author_edit_page_redirects_to_detail() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let intruder = user(&f.state, "intruder").await;
    let target = post(&f.state, &author, "Mine", None).await;
    let app = app!(f.state);

    let (name, token) = session(&f.state, &intruder);
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", target.id))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(name, ACCESS_TOKEN_COOKIE);
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", target.id));
}

fn multipart_text(text: &str) -> String {
    format!(
        "--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"text\"\r\n\r\n\
        {text}\r\n\
        --XBOUNDARY--\r\n"
    )
}

#[actix_web::test]
async fn test_non_author_edit_submission_changes_nothing() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let intruder = user(&f.state, "intruder").await;
    let original = post(&f.state, &author, "Untouched", None).await;
    let app = app!(f.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .cookie(actix_web::cookie::Cookie::new(
            ACCESS_TOKEN_COOKIE,
            session(&f.state, &intruder).1,
        ))
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        ))
        .set_payload(multipart_text("Hijacked"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", original.id));
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
    assert_eq!(f.state.posts.count(PostFilter::All).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_author_edit_submission_over_http() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let original = post(&f.state, &author, "Before", None).await;
    let app = app!(f.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .cookie(actix_web::cookie::Cookie::new(
            ACCESS_TOKEN_COOKIE,
            session(&f.state, &author).1,
        ))
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        ))
        .set_payload(multipart_text("After"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", original.id));
    let stored = f.state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "After");
}

#[actix_web::test]
async fn test_multipart_create() {
    let f = fixture();
    let author = user(&f.state, "auth").await;
    let app = app!(f.state);

    let body = "--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"text\"\r\n\r\n\
        Posted over HTTP\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"group\"\r\n\r\n\
        \r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"image\"; filename=\"\"\r\n\
        Content-Type: application/octet-stream\r\n\r\n\
        \r\n\
        --XBOUNDARY--\r\n";

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(actix_web::cookie::Cookie::new(
            ACCESS_TOKEN_COOKIE,
            session(&f.state, &author).1,
        ))
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        ))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/auth/");
    let posts = f.state.posts.list(PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "Posted over HTTP");
    assert_eq!(posts[0].group_id, None);
    assert_eq!(posts[0].image, None);
}

#[actix_web::test]
async fn test_signup_then_login_sets_cookie() {
    let f = fixture();
    let app = app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newbie"),
            ("email", "newbie@example.com"),
            ("password1", "correct-horse"),
            ("password2", "correct-horse"),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(res.response().cookies().any(|c| c.name() == ACCESS_TOKEN_COOKIE));
    assert!(f.state.users.find_by_username("newbie").await.unwrap().is_some());

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "newbie"),
            ("password", "correct-horse"),
            ("next", "/create/"),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/create/");

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "newbie"), ("password", "wrong-password")])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().next().is_none());
}

#[actix_web::test]
async fn test_invalid_signup_rerenders_form() {
    let f = fixture();
    let app = app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newbie"),
            ("email", "a@"),
            ("password1", "correct-horse"),
            ("password2", "correct-horse"),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().next().is_none());
    let body = test::read_body(res).await;
    assert!(String::from_utf8_lossy(&body).contains(INVALID_EMAIL));
    assert!(f.state.users.find_by_username("newbie").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_duplicate_signup_is_a_form_error() {
    let f = fixture();
    user(&f.state, "taken").await;
    let app = app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "taken"),
            ("password1", "correct-horse"),
            ("password2", "correct-horse"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert!(String::from_utf8_lossy(&body).contains("already exists"));
}

#[actix_web::test]
async fn test_media_is_served() {
    let f = fixture();
    let name = f.images.save("png", &png_bytes()).await.unwrap();
    let app = app!(f.state);

    let req = test::TestRequest::get()
        .uri(&format!("/media/{name}"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");

    let req = test::TestRequest::get().uri("/media/posts/missing.png").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health() {
    let f = fixture();
    let app = app!(f.state);

    let req = test::TestRequest::get().uri("/health/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
