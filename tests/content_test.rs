//! Tests for the destination catalog, images, pages, travel vehicles and the
//! health check

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_destination, delete, get, post, put, setup_test_app};

#[tokio::test]
async fn test_health() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_destination_validation() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = post(
        &app,
        "/destinations",
        json!({ "name": "Goa", "type": "beach", "imageUrl": "goa.jpg" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, type, description, and imageUrl are required");

    let (status, _) = post(
        &app,
        "/destinations",
        json!({
            "name": "Goa",
            "type": "beach",
            "description": "sand",
            "imageUrl": "goa.jpg",
            "rating": 7.5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = get(&app, "/destinations").await;
    assert_eq!(all.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_destination() {
    let (app, _temp_db) = setup_test_app();
    let goa = create_destination(&app, "Goa", "beach", 4.5).await;

    let (status, body) = get(&app, &format!("/destinations/{goa}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Goa");
    assert_eq!(body["type"], "beach");
    assert_eq!(body["imageUrl"], "goa.jpg");

    let (status, body) = get(&app, "/destinations/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Destination not found");
}

#[tokio::test]
async fn test_update_destination_is_partial() {
    let (app, _temp_db) = setup_test_app();
    let goa = create_destination(&app, "Goa", "beach", 4.5).await;

    let (status, body) = put(
        &app,
        &format!("/destinations/{goa}"),
        json!({ "rating": 4.8, "reviews": 310 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"]["rating"], 4.8);
    assert_eq!(body["destination"]["reviews"], 310);
    assert_eq!(body["destination"]["name"], "Goa");
    assert_eq!(body["destination"]["description"], "Goa description");

    let (status, _) = put(&app, &format!("/destinations/{goa}"), json!({ "rating": -1.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put(&app, "/destinations/missing", json!({ "name": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_destination_leaves_others() {
    let (app, _temp_db) = setup_test_app();
    let goa = create_destination(&app, "Goa", "beach", 4.5).await;
    let ooty = create_destination(&app, "Ooty", "hill-station", 4.1).await;

    let (status, body) = delete(&app, &format!("/destinations/{goa}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_id"], goa.as_str());

    let (_, all) = get(&app, "/destinations").await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["_id"], ooty.as_str());

    let (status, _) = delete(&app, &format!("/destinations/{goa}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_images_filter_by_category() {
    let (app, _temp_db) = setup_test_app();

    for (url, category) in [("a.jpg", "beach"), ("b.jpg", "mountain"), ("c.jpg", "beach")] {
        let (status, body) = post(
            &app,
            "/images",
            json!({ "title": url, "url": url, "category": category }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Image uploaded!");
    }

    let (_, all) = get(&app, "/images").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, beach) = get(&app, "/images?category=beach").await;
    assert_eq!(status, StatusCode::OK);
    let beach = beach.as_array().unwrap();
    assert_eq!(beach.len(), 2);
    assert!(beach.iter().all(|image| image["category"] == "beach"));

    let (_, none) = get(&app, "/images?category=desert").await;
    assert_eq!(none.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_image_requires_url_and_category() {
    let (app, _temp_db) = setup_test_app();

    let (status, _) = post(&app, "/images", json!({ "url": "", "category": "beach" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pages() {
    let (app, _temp_db) = setup_test_app();

    let (status, page) = post(
        &app,
        "/pages",
        json!({ "slug": "about", "title": "About us", "content": "We travel." }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(page["slug"], "about");

    let (status, _) = post(&app, "/pages", json!({ "slug": "about", "title": "Again" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, fetched) = get(&app, "/pages/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "About us");
    assert_eq!(fetched["content"], "We travel.");

    let (status, body) = get(&app, "/pages/contact").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page not found");

    let (_, pages) = get(&app, "/pages").await;
    assert_eq!(pages.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_travel_catalog_is_seeded() {
    let (app, _temp_db) = setup_test_app();

    let (status, travels) = get(&app, "/travels").await;

    assert_eq!(status, StatusCode::OK);
    let travels = travels.as_array().unwrap();
    assert_eq!(travels.len(), 3);
    let thar = travels
        .iter()
        .find(|t| t["name"] == "Thar")
        .expect("Thar should be seeded");
    assert_eq!(thar["seats"], 6);
    assert_eq!(thar["costPerDay"], 450);
    assert_eq!(thar["available"], true);
}

#[tokio::test]
async fn test_create_travel() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = post(
        &app,
        "/travels",
        json!({ "name": "Innova", "seats": 7, "costPerDay": 500, "imageUrl": "innova.jpg" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["travel"]["available"], true);

    let (status, _) = post(
        &app,
        "/travels",
        json!({ "name": "Empty", "seats": 0, "costPerDay": 1, "imageUrl": "e.jpg" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, travels) = get(&app, "/travels").await;
    assert_eq!(travels.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_search_destinations_ranked_by_rating() {
    let (app, _temp_db) = setup_test_app();
    create_destination(&app, "Goa", "beach", 4.2).await;
    create_destination(&app, "Manali", "hill-station", 4.8).await;
    create_destination(&app, "Gokarna", "beach", 4.5).await;

    let (status, all) = get(&app, "/destinations").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Manali", "Gokarna", "Goa"]);

    let (_, beaches) = get(&app, "/destinations?type=beach").await;
    assert_eq!(beaches[0]["name"], "Gokarna");
    assert_eq!(beaches.as_array().unwrap().len(), 2);

    let (_, found) = get(&app, "/destinations?q=GOA").await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Goa");

    let (_, none) = get(&app, "/destinations?q=desert&type=all").await;
    assert_eq!(none.as_array().unwrap().len(), 0);
}
