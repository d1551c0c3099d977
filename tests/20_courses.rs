mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn create_course(
    client: &Client,
    base_url: &str,
    token: &str,
    payload: Value,
) -> Result<Value> {
    let res = client
        .post(format!("{}/courses/", base_url))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "course creation failed");
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn create_course_with_lessons_persists_all() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let token = common::mint_token("u1", "instructor");

    let course = create_course(
        &client,
        &server.base_url,
        &token,
        json!({
            "title": "Algebra",
            "price": 10.0,
            "lessons": [{"title": "Intro"}, {"title": "Linear equations", "content": "ax + b"}]
        }),
    )
    .await?;

    assert_eq!(course["instructor_id"], "u1");
    assert_eq!(course["title"], "Algebra");
    assert_eq!(course["lessons"].as_array().map(Vec::len), Some(2));
    assert_eq!(course["lessons"][0]["title"], "Intro");

    // Reads are idempotent: two gets without mutation return the same fields
    let id = course["id"].as_i64().expect("course id");
    let first = client
        .get(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let second = client
        .get(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn list_courses_paginates_in_id_order() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let token = common::mint_token("u1", "instructor");

    for title in ["Pagination A", "Pagination B", "Pagination C"] {
        create_course(
            &client,
            &server.base_url,
            &token,
            json!({"title": title, "price": 1.0}),
        )
        .await?;
    }

    let page = |skip: i64| {
        let client = client.clone();
        let url = format!("{}/courses/?skip={}&limit=1", server.base_url, skip);
        let token = token.clone();
        async move {
            let res = client.get(url).bearer_auth(token).send().await?;
            assert_eq!(res.status(), StatusCode::OK);
            let body = res.json::<Value>().await?;
            anyhow::Ok(body.as_array().expect("course list").clone())
        }
    };

    let first = page(0).await?;
    let second = page(1).await?;
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(
        second[0]["id"].as_i64() > first[0]["id"].as_i64(),
        "listing must be ordered by id ascending"
    );
    Ok(())
}

#[tokio::test]
async fn partial_update_changes_only_the_given_field() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let token = common::mint_token("u1", "instructor");

    let course = create_course(
        &client,
        &server.base_url,
        &token,
        json!({"title": "Calculus", "description": "Derivatives", "price": 20.0}),
    )
    .await?;
    let id = course["id"].as_i64().expect("course id");

    let res = client
        .put(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({"price": 9.99}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["price"], 9.99);
    assert_eq!(updated["title"], "Calculus");
    assert_eq!(updated["description"], "Derivatives");
    assert_eq!(updated["instructor_id"], "u1");
    Ok(())
}

#[tokio::test]
async fn mutation_by_non_owner_is_forbidden() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let owner = common::mint_token("u1", "instructor");
    let intruder = common::mint_token("u2", "instructor");

    let course = create_course(
        &client,
        &server.base_url,
        &owner,
        json!({"title": "Algebra", "price": 10.0, "lessons": [{"title": "Intro"}]}),
    )
    .await?;
    let id = course["id"].as_i64().expect("course id");

    let res = client
        .put(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&intruder)
        .json(&json!({"title": "Hijacked"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "FORBIDDEN");

    let res = client
        .delete(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&intruder)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The course is untouched
    let res = client
        .get(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&owner)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["title"], "Algebra");
    Ok(())
}

#[tokio::test]
async fn delete_cascades_to_lessons() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let token = common::mint_token("u1", "instructor");

    let course = create_course(
        &client,
        &server.base_url,
        &token,
        json!({"title": "Doomed", "price": 5.0, "lessons": [{"title": "One"}, {"title": "Two"}]}),
    )
    .await?;
    let id = course["id"].as_i64().expect("course id");

    let res = client
        .delete(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Course deleted successfully");

    // The course is gone and so are its lessons
    let res = client
        .get(format!("{}/courses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/lessons/course/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let lessons = res.json::<Value>().await?;
    assert_eq!(lessons.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn missing_course_is_not_found() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();
    let token = common::mint_token("u1", "instructor");

    let res = client
        .get(format!("{}/courses/999999999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Course not found");

    let res = client
        .put(format!("{}/courses/999999999", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "Nope"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/courses/999999999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
