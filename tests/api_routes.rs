mod common;

use std::io::Write;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::{seed, test_config, test_state, RecordingNotifier};
use portal::config::{MailConfig, MailTransportConfig, SmtpConfig, SmtpSecurity};
use portal::data::applications::Application;
use portal::data::database::Database;
use portal::data::profiles::{NewProfile, Profile};
use portal::notify::Dispatcher;
use portal::state::AppState;
use portal::utils::encrypt::issue_token;
use portal::utils::enums::{ApplicationStatus, Role};

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service($app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn bearer(token: &Value) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token.as_str().unwrap()))
}

#[actix_web::test]
async fn health_check_reports_healthy() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (status, body) = call!(&app, test::TestRequest::get().uri("/health_check"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn statuses_are_listed_in_pipeline_order() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (_, body) = call!(&app, test::TestRequest::get().uri("/api/v1/statuses"));
    let statuses = body["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 8);
    assert_eq!(statuses[0]["key"], "applied");
    assert_eq!(statuses[2]["label"], "Assignment Round");
    assert_eq!(statuses[7]["tone"], "red");
}

#[actix_web::test]
async fn protected_routes_need_a_token() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (status, body) = call!(&app, test::TestRequest::get().uri("/api/v1/session"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = call!(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth")
            .set_json(json!({ "email": "someone@example.com" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request format"));
}

#[actix_web::test]
async fn registration_and_login() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let signup = json!({
        "email": "Priya@Example.com",
        "password": "secret1",
        "full_name": "Priya Shah"
    });
    let (status, body) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(&signup)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "candidate");

    let (status, _) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(&signup)
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "email": "short@example.com",
            "password": "12345",
            "full_name": "Short"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "priya@example.com",
            "password": "wrong-password"
        }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "priya@example.com",
            "password": "secret1"
        }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, session) = call!(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header(bearer(&body["token"]))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["profile"]["email"], "priya@example.com");
    assert!(session["profile"].get("password_hash").is_none());
}

#[actix_web::test]
async fn hiring_flow_end_to_end() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = test_state(notifier.clone(), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    // admin creates the employer
    let (_, admin) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "admin@portal.test",
            "password": "admin-pass"
        }))
    );
    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/employers")
            .insert_header(bearer(&admin["token"]))
            .set_json(json!({
                "email": "hr@acme.io",
                "password": "acme-pass",
                "full_name": "Dana Recruiter",
                "company_name": "Acme Corp"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (_, found) = call!(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/employers?search=acme")
            .insert_header(bearer(&admin["token"]))
    );
    assert_eq!(found["employers"].as_array().unwrap().len(), 1);

    let (_, employer) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "hr@acme.io",
            "password": "acme-pass"
        }))
    );

    // employer posts a job
    let (status, posted) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(bearer(&employer["token"]))
            .set_json(json!({
                "title": "Backend Engineer",
                "description": "Own the hiring APIs",
                "location": "Pune",
                "job_type": "Hybrid",
                "salary_min": 1200000,
                "salary_max": 1800000
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let job_id = posted["job"]["id"].as_str().unwrap().to_string();

    // candidate signs up, searches and applies
    let (_, candidate) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "email": "priya@example.com",
            "password": "secret1",
            "full_name": "Priya Shah"
        }))
    );

    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({ "title": "x", "description": "y", "location": "z" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = call!(
        &app,
        test::TestRequest::get().uri("/api/v1/jobs?search=backend&location=pune&job_type=all")
    );
    let jobs = listed["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["company_name"], "Acme Corp");

    let apply_uri = format!("/api/v1/jobs/{}/apply", job_id);
    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri(&apply_uri)
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({ "resume_link": "   " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, applied) = call!(
        &app,
        test::TestRequest::post()
            .uri(&apply_uri)
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({
                "resume_link": "https://cv.example/priya",
                "cover_letter": "I build APIs."
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(applied["application"]["status"], "applied");
    let application_id = applied["application"]["id"].as_str().unwrap().to_string();

    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri(&apply_uri)
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({ "resume_link": "https://cv.example/priya" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = call!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{}", job_id))
            .insert_header(bearer(&candidate["token"]))
    );
    assert_eq!(detail["has_applied"], true);

    // employer moves the application along
    let (status, updated) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{}/status", application_id))
            .insert_header(bearer(&employer["token"]))
            .set_json(json!({
                "status": "assignment",
                "assignment_name": "Task A",
                "assignment_link": "https://x/y"
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notified"], true);
    assert_eq!(updated["application"]["assignment_name"], "Task A");
    assert_eq!(notifier.last().unwrap().status, "Assignment Round");

    let (status, _) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{}/status", application_id))
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({ "status": "hired" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{}/notes", application_id))
            .insert_header(bearer(&employer["token"]))
            .set_json(json!({ "notes": "Great take-home" }))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, applicants) = call!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{}/applications", job_id))
            .insert_header(bearer(&employer["token"]))
    );
    let first = &applicants["applications"][0];
    assert_eq!(first["notes"], "Great take-home");
    assert_eq!(first["candidate_name"], "Priya Shah");
    assert_eq!(first["status"]["label"], "Assignment Round");

    // candidate sees progress but never the notes
    let (_, mine) = call!(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/candidate/applications")
            .insert_header(bearer(&candidate["token"]))
    );
    assert_eq!(mine["stats"], json!({ "total": 1, "in_progress": 1, "hired": 0 }));
    assert!(mine["applications"][0].get("notes").is_none());
    assert_eq!(mine["applications"][0]["assignment_link"], "https://x/y");

    let (_, dashboard) = call!(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/employer/jobs")
            .insert_header(bearer(&employer["token"]))
    );
    assert_eq!(
        dashboard["stats"],
        json!({ "total_jobs": 1, "active_jobs": 1, "total_applications": 1 })
    );
    assert_eq!(dashboard["jobs"][0]["application_count"], 1);
}

#[actix_web::test]
async fn closed_jobs_are_hidden_and_refuse_applications() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (_, admin) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "admin@portal.test",
            "password": "admin-pass"
        }))
    );
    call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/employers")
            .insert_header(bearer(&admin["token"]))
            .set_json(json!({
                "email": "hr@acme.io",
                "password": "acme-pass",
                "full_name": "Dana Recruiter",
                "company_name": "Acme Corp"
            }))
    );
    let (_, employer) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/auth").set_json(json!({
            "email": "hr@acme.io",
            "password": "acme-pass"
        }))
    );
    let (_, posted) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(bearer(&employer["token"]))
            .set_json(json!({
                "title": "Designer",
                "description": "Design things",
                "location": "Remote"
            }))
    );
    let job_id = posted["job"]["id"].as_str().unwrap().to_string();

    let (status, closed) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/jobs/{}", job_id))
            .insert_header(bearer(&employer["token"]))
            .set_json(json!({
                "title": "Designer",
                "description": "Design things",
                "location": "Remote",
                "status": "inactive"
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["job"]["status"], "inactive");

    let (_, listed) = call!(&app, test::TestRequest::get().uri("/api/v1/jobs"));
    assert!(listed["jobs"].as_array().unwrap().is_empty());

    let (_, candidate) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "email": "sam@example.com",
            "password": "secret1",
            "full_name": "Sam"
        }))
    );
    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{}/apply", job_id))
            .insert_header(bearer(&candidate["token"]))
            .set_json(json!({ "resume_link": "https://cv.example/sam" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This job is no longer accepting applications");
}

#[actix_web::test]
async fn profile_image_upload_is_stored_and_served() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.uploads_dir = uploads.path().to_path_buf();
    let state = test_state(Arc::new(RecordingNotifier::default()), config);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (_, candidate) = call!(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "email": "priya@example.com",
            "password": "secret1",
            "full_name": "Priya Shah"
        }))
    );
    let user_id = candidate["user_id"].as_str().unwrap().to_string();

    let boundary = "portalboundary";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"me.PNG\"\r\n\
         Content-Type: image/png\r\n\r\nfake-png-bytes\r\n--{b}--\r\n",
        b = boundary
    );
    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/profiles/{}/images/profile", user_id))
            .insert_header(bearer(&candidate["token"]))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(payload)
    );
    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap().to_string();
    let prefix = format!("http://localhost:8080/uploads/{}/profile-", user_id);
    assert!(url.starts_with(&prefix));
    assert!(url.ends_with(".png"));

    let path = url.trim_start_matches("http://localhost:8080");
    let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"fake-png-bytes");

    let (_, profile) = call!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/profiles/{}", user_id))
            .insert_header(bearer(&candidate["token"]))
    );
    assert_eq!(profile["profile"]["profile_image_url"], url.as_str());

    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/profiles/{}/images/banner", user_id))
            .insert_header(bearer(&candidate["token"]))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload("")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn candidate_contact_details_are_not_public() {
    let state = test_state(Arc::new(RecordingNotifier::default()), test_config());
    let s = seed(&state.db);
    let (other_candidate, other_employer) = {
        let conn = state.db.conn().unwrap();
        let candidate = Profile::create(
            &conn,
            Role::Candidate,
            &NewProfile {
                email: "sam@example.com".to_string(),
                password_hash: "unused".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        let employer = Profile::create(
            &conn,
            Role::Employer,
            &NewProfile {
                email: "hr@globex.io".to_string(),
                password_hash: "unused".to_string(),
                company_name: Some("Globex".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        (candidate, employer)
    };
    let token = |p: &Profile| json!(issue_token("test-secret", p, 1).unwrap());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let priya_uri = format!("/api/v1/profiles/{}", s.candidate.id);
    for (viewer, expected) in [
        (&other_candidate, StatusCode::FORBIDDEN),
        (&other_employer, StatusCode::FORBIDDEN),
        (&s.employer, StatusCode::OK),
        (&s.candidate, StatusCode::OK),
    ] {
        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri(&priya_uri)
                .insert_header(bearer(&token(viewer)))
        );
        assert_eq!(status, expected, "viewer {}", viewer.email);
        if status == StatusCode::OK {
            assert_eq!(body["profile"]["email"], "priya@example.com");
        } else {
            assert_eq!(body["success"], false);
            assert!(body.get("profile").is_none());
        }
    }

    // company pages stay readable to any signed-in user
    let (status, body) = call!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/profiles/{}", s.employer.id))
            .insert_header(bearer(&token(&other_candidate)))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["company_name"], "Acme");
}

#[actix_web::test]
async fn garbled_smtp_greeting_still_saves_the_status() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        if let Ok((mut socket, _)) = listener.accept() {
            let _ = socket.write_all("ab\u{e9} service ready\r\n".as_bytes());
            std::thread::sleep(Duration::from_millis(500));
        }
    });

    let dispatcher = Dispatcher::from_config(&MailConfig {
        from: "Hiring Team <jobs@example.com>".to_string(),
        transport: MailTransportConfig::Smtp(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            security: SmtpSecurity::StartTls,
        }),
    });
    let state = AppState::new(
        Database::open_in_memory().unwrap(),
        Arc::new(dispatcher),
        test_config(),
    );
    let s = seed(&state.db);
    let token = json!(issue_token("test-secret", &s.employer, 1).unwrap());
    let db = state.db.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(portal::configure),
    )
    .await;

    let (status, body) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{}/status", s.application.id))
            .insert_header(bearer(&token))
            .set_json(json!({ "status": "hired" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notified"], false);
    assert_eq!(body["application"]["status"], "hired");

    let stored = Application::get(&db.conn().unwrap(), &s.application.id).unwrap();
    assert_eq!(stored.status, ApplicationStatus::Hired);
}
