use serde_json::json;
use shoppu_test_util::prelude::*;


#[tokio::test]
async fn creating_a_duplicate_category_fails_validation() {
    let server = initialize_test_server().await;

    let first_response = server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({ "category": { "name": "Shoes" } }))
        .send()
        .await;

    first_response.assert_status_equals(StatusCode::OK);
    assert!(first_response.text_body().contains("\"name\":\"Shoes\""));


    let second_response = server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({ "category": { "name": "Shoes" } }))
        .send()
        .await;

    second_response.assert_error_notification(
        StatusCode::NOT_ACCEPTABLE,
        "Cannot create category: name has already been taken!",
    );


    let index_response = server.request(Method::GET, "/api/categories").send().await;
    index_response.assert_status_equals(StatusCode::OK);

    let categories = index_response.json_body::<Vec<Category>>();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Shoes");
}


#[tokio::test]
async fn blank_names_and_unknown_parents_are_rejected() {
    let server = initialize_test_server().await;

    server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({ "category": { "name": "   " } }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_ACCEPTABLE,
            "Cannot create category: name can't be blank!",
        );

    server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({ "category": {} }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_ACCEPTABLE,
            "Cannot create category: name can't be blank!",
        );

    server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({
            "category": { "name": "Orphan", "parentId": Uuid::nil() }
        }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_ACCEPTABLE,
            "Cannot create category: parent category does not exist!",
        );
}


#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let server = initialize_test_server().await;

    let unknown_field_response = server
        .request(Method::POST, "/api/categories")
        .with_json_body(json!({ "category": { "name": "Shoes", "color": "red" } }))
        .send()
        .await;

    unknown_field_response.assert_status_equals(StatusCode::BAD_REQUEST);
    assert_eq!(
        unknown_field_response
            .json_body::<NotificationResponse>()
            .notification
            .level,
        NotificationLevel::Error
    );

    server
        .request(Method::POST, "/api/categories")
        .with_raw_json_body("{\"category\": ")
        .send()
        .await
        .assert_status_equals(StatusCode::BAD_REQUEST);

    server
        .request(Method::GET, "/api/categories/not-an-id")
        .send()
        .await
        .assert_status_equals(StatusCode::BAD_REQUEST);

    server
        .request(Method::GET, "/api/categories?page=first&per_page=2")
        .send()
        .await
        .assert_status_equals(StatusCode::BAD_REQUEST);
}


#[tokio::test]
async fn categories_show_their_lineage() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let sneakers = create_sample_category(&server, SampleCategory::Sneakers, Some(shoes.id)).await;

    assert_eq!(sneakers.parent_id, Some(shoes.id));
    assert_eq!(sneakers.parent_name.as_deref(), Some("Shoes"));
    assert!(sneakers.display_name.starts_with(&shoes.display_name));
    assert!(sneakers.display_name.ends_with("] Sneakers"));
    assert!(sneakers.display_name.contains(" > "));


    let show_response = server
        .request(Method::GET, format!("/api/categories/{}", sneakers.id))
        .send()
        .await;

    show_response.assert_status_equals(StatusCode::OK);
    show_response.assert_json_body_matches(sneakers);
}


#[tokio::test]
async fn missing_categories_are_not_found() {
    let server = initialize_test_server().await;
    let missing_id = Uuid::nil();

    server
        .request(Method::GET, format!("/api/categories/{missing_id}"))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_FOUND,
            "Cannot show category: record not found!",
        );

    server
        .request(Method::PUT, format!("/api/categories/{missing_id}"))
        .with_json_body(json!({ "category": { "name": "Anything" } }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_FOUND,
            "Cannot update category: record not found!",
        );

    server
        .request(Method::DELETE, format!("/api/categories/{missing_id}"))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_FOUND,
            "Cannot destroy category: record not found!",
        );
}


#[tokio::test]
async fn index_is_filtered_and_paginated() {
    let server = initialize_test_server().await;

    let mut created = Vec::new();
    for name in ["Shoes", "Hats", "Shirts", "Socks", "Scarves"] {
        created.push(create_category(&server, name, None).await);
    }


    let unfiltered = server
        .request(Method::GET, "/api/categories")
        .send()
        .await
        .json_body::<Vec<Category>>();
    assert_eq!(unfiltered, created);

    let empty_query = server
        .request(Method::GET, "/api/categories?query=")
        .send()
        .await
        .json_body::<Vec<Category>>();
    assert_eq!(empty_query, created);


    let filtered = server
        .request(Method::GET, "/api/categories?query=sh")
        .send()
        .await
        .json_body::<Vec<Category>>();

    let expected_filtered: Vec<Category> = created
        .iter()
        .filter(|category| category.name.to_lowercase().contains("sh"))
        .cloned()
        .collect();
    assert_eq!(filtered, expected_filtered);

    let wildcard = server
        .request(Method::GET, "/api/categories?query=%25")
        .send()
        .await
        .json_body::<Vec<Category>>();
    assert!(wildcard.is_empty());


    for (per_page, page) in [(2usize, 1usize), (2, 2), (2, 3), (3, 2), (5, 2)] {
        let page_response = server
            .request(
                Method::GET,
                format!("/api/categories?per_page={per_page}&page={page}"),
            )
            .send()
            .await;
        page_response.assert_status_equals(StatusCode::OK);

        let page_items = page_response.json_body::<Vec<Category>>();

        let expected: Vec<Category> = created
            .iter()
            .skip(per_page * (page - 1))
            .take(per_page)
            .cloned()
            .collect();

        assert!(page_items.len() <= per_page);
        assert_eq!(page_items, expected, "per_page={per_page}, page={page}");
    }
}


#[tokio::test]
async fn count_and_options_reflect_all_categories() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let hats = create_sample_category(&server, SampleCategory::Hats, None).await;
    let accessories = create_sample_category(&server, SampleCategory::Accessories, None).await;

    server
        .request(Method::GET, "/api/categories/count")
        .send()
        .await
        .assert_json_body_matches(CountResponse { count: 3 });

    server
        .request(Method::GET, "/api/categories/options")
        .send()
        .await
        .assert_json_body_matches(vec![
            SelectOption {
                value: accessories.id.into_uuid(),
                text: "Accessories".to_string(),
            },
            SelectOption {
                value: hats.id.into_uuid(),
                text: "Hats".to_string(),
            },
            SelectOption {
                value: shoes.id.into_uuid(),
                text: "Shoes".to_string(),
            },
        ]);
}


#[tokio::test]
async fn updates_apply_only_the_given_fields() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let sneakers = create_sample_category(&server, SampleCategory::Sneakers, Some(shoes.id)).await;
    let hats = create_sample_category(&server, SampleCategory::Hats, None).await;


    let rename_response = server
        .request(Method::PUT, format!("/api/categories/{}", sneakers.id))
        .with_json_body(json!({ "category": { "name": "Trainers" } }))
        .send()
        .await;
    rename_response.assert_status_equals(StatusCode::OK);

    let renamed = rename_response.json_body::<Category>();
    assert_eq!(renamed.name, "Trainers");
    assert_eq!(renamed.parent_id, Some(shoes.id));


    let detach_response = server
        .request(Method::PATCH, format!("/api/categories/{}", sneakers.id))
        .with_json_body(json!({ "category": { "parentId": null } }))
        .send()
        .await;
    detach_response.assert_status_equals(StatusCode::OK);

    let detached = detach_response.json_body::<Category>();
    assert_eq!(detached.name, "Trainers");
    assert_eq!(detached.parent_id, None);
    assert_eq!(detached.parent_name, None);


    server
        .request(Method::PUT, format!("/api/categories/{}", sneakers.id))
        .with_json_body(json!({ "category": { "name": "Hats" } }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_ACCEPTABLE,
            "Cannot update category: name has already been taken!",
        );

    // Renaming to its own current name is fine.
    server
        .request(Method::PUT, format!("/api/categories/{}", hats.id))
        .with_json_body(json!({ "category": { "name": "Hats" } }))
        .send()
        .await
        .assert_status_equals(StatusCode::OK);
}


#[tokio::test]
async fn categories_cannot_become_their_own_ancestors() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let sneakers = create_sample_category(&server, SampleCategory::Sneakers, Some(shoes.id)).await;

    server
        .request(Method::PUT, format!("/api/categories/{}", shoes.id))
        .with_json_body(json!({ "category": { "parentId": sneakers.id } }))
        .send()
        .await
        .assert_error_notification(
            StatusCode::NOT_ACCEPTABLE,
            "Cannot update category: a category cannot be its own ancestor!",
        );

    server
        .request(Method::PUT, format!("/api/categories/{}", shoes.id))
        .with_json_body(json!({ "category": { "parentId": shoes.id } }))
        .send()
        .await
        .assert_status_equals(StatusCode::NOT_ACCEPTABLE);
}


#[tokio::test]
async fn deleting_a_category_cascades_to_its_products() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let sneakers = create_sample_category(&server, SampleCategory::Sneakers, Some(shoes.id)).await;
    let hats = create_sample_category(&server, SampleCategory::Hats, None).await;

    create_sample_product(&server, SampleProduct::Zephyr, shoes.id).await;
    create_sample_product(&server, SampleProduct::Boreas, sneakers.id).await;
    create_sample_product(&server, SampleProduct::Notus, sneakers.id).await;
    let eurus = create_sample_product(&server, SampleProduct::Eurus, hats.id).await;


    let delete_response = server
        .request(Method::DELETE, format!("/api/categories/{}", sneakers.id))
        .send()
        .await;
    delete_response.assert_status_equals(StatusCode::OK);

    let deleted = delete_response.json_body::<Category>();
    assert_eq!(deleted.id, sneakers.id);
    assert_eq!(deleted.name, "Sneakers");


    let remaining_products = server
        .request(Method::GET, "/api/products")
        .send()
        .await
        .json_body::<Vec<Product>>();

    let remaining_names: Vec<&str> = remaining_products
        .iter()
        .map(|product| product.name.as_str())
        .collect();
    assert_eq!(remaining_names, vec!["Eurus", "Zephyr"]);
    assert!(remaining_products
        .iter()
        .all(|product| product.category_id != sneakers.id));


    let shoes_after = server
        .request(Method::GET, format!("/api/categories/{}", shoes.id))
        .send()
        .await
        .json_body::<Category>();
    assert_eq!(shoes_after.products_count, 1);

    server
        .request(Method::GET, format!("/api/products/{}", eurus.id))
        .send()
        .await
        .assert_status_equals(StatusCode::OK);

    server
        .request(Method::GET, format!("/api/categories/{}", sneakers.id))
        .send()
        .await
        .assert_status_equals(StatusCode::NOT_FOUND);
}


#[tokio::test]
async fn deleting_a_parent_detaches_its_children() {
    let server = initialize_test_server().await;

    let shoes = create_sample_category(&server, SampleCategory::Shoes, None).await;
    let sneakers = create_sample_category(&server, SampleCategory::Sneakers, Some(shoes.id)).await;

    server
        .request(Method::DELETE, format!("/api/categories/{}", shoes.id))
        .send()
        .await
        .assert_status_equals(StatusCode::OK);

    let sneakers_after = server
        .request(Method::GET, format!("/api/categories/{}", sneakers.id))
        .send()
        .await
        .json_body::<Category>();

    assert_eq!(sneakers_after.parent_id, None);
    assert_eq!(sneakers_after.parent_name, None);
    assert!(!sneakers_after.display_name.contains(" > "));
}
