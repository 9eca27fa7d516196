mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn players_and_clubs_are_listed_and_fetched() {
    let app = app();
    let player = create_player(&app, "Iris").await;
    let club = create_club(&app, "Den Bosch").await;

    let res = get(&app, "/api/players").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let res = get(&app, &format!("/api/players/{player}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Iris");
    assert_eq!(res.body["experience_level"], "Intermediate");

    let res = get(&app, &format!("/api/clubs/{club}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["established_year"], 1950);

    let res = get(&app, &format!("/api/clubs/{}", Uuid::new_v4())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["detail"], "Club not found");

    let res = get(&app, "/api/players/not-a-uuid").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = app();
    create_player(&app, "Joost").await;
    let res = post(
        &app,
        "/api/players",
        json!({
            "name": "Another Joost",
            "email": "joost@players.test",
            "position": "Forward",
            "experience_level": "beginner",
            "location": "Haarlem"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["detail"], "Email already registered");
}

#[tokio::test]
async fn invalid_player_fields_are_rejected() {
    let app = app();
    let res = post(
        &app,
        "/api/players",
        json!({
            "name": "",
            "email": "nobody",
            "position": "Forward",
            "experience_level": "Beginner",
            "location": "Haarlem"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = post(
        &app,
        "/api/players",
        json!({
            "name": "Kees",
            "email": "kees@players.test",
            "position": "Forward",
            "experience_level": "Legendary",
            "location": "Haarlem"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vacancy_and_application_lifecycle() {
    let app = app();
    let player = create_player(&app, "Lotte").await;
    let club = create_club(&app, "Laren").await;

    let res = post(
        &app,
        "/api/vacancies",
        json!({
            "club_id": Uuid::new_v4(),
            "position": "Goalkeeper",
            "description": "Ladies 1",
            "experience_level": "Advanced",
            "location": "Laren"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["detail"], "Club not found");

    let mut vacancy_ids = Vec::new();
    for position in ["Goalkeeper", "Defender"] {
        let res = post(
            &app,
            "/api/vacancies",
            json!({
                "club_id": club,
                "position": position,
                "description": "Ladies 1",
                "requirements": "Two seasons at hoofdklasse level",
                "experience_level": "Advanced",
                "location": "Laren"
            }),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        assert_eq!(res.body["club_name"], "Laren");
        vacancy_ids.push(res.body["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let res = get(&app, &format!("/api/clubs/{club}/vacancies")).await;
    let positions: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["position"].as_str().unwrap())
        .collect();
    assert_eq!(positions, ["Defender", "Goalkeeper"], "newest first");

    let res = get(&app, &format!("/api/vacancies/{}", vacancy_ids[0])).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["position"], "Goalkeeper");

    let apply = json!({ "player_id": player, "vacancy_id": vacancy_ids[0] });
    let res = post(&app, "/api/applications", apply.clone()).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["status"], "pending");
    assert_eq!(res.body["player_name"], "Lotte");
    assert_eq!(res.body["vacancy_position"], "Goalkeeper");

    let res = post(&app, "/api/applications", apply).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["detail"], "Already applied to this vacancy");

    let res = post(
        &app,
        "/api/applications",
        json!({ "player_id": player, "vacancy_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["detail"], "Vacancy not found");

    for uri in [
        "/api/applications".to_string(),
        format!("/api/players/{player}/applications"),
        format!("/api/clubs/{club}/applications"),
    ] {
        let res = get(&app, &uri).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body.as_array().unwrap().len(), 1, "{uri}");
    }
}

#[tokio::test]
async fn player_profile_can_be_edited() {
    let app = app();
    let player = create_player(&app, "Lotte").await;
    create_player(&app, "Femke").await;
    let uri = format!("/api/players/{player}");

    let res = put_json(
        &app,
        &uri,
        json!({ "location": "Haarlem", "age": 23, "bio": "Drag flick specialist", "country": "NL" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["location"], "Haarlem");
    assert_eq!(res.body["age"], 23);
    assert_eq!(res.body["name"], "Lotte");

    let res = get(&app, &uri).await;
    assert_eq!(res.body["bio"], "Drag flick specialist");

    let res = put_json(&app, &uri, json!({ "email": "femke@players.test" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["detail"], "Email already registered");

    let res = put_json(&app, &uri, json!({ "email": "not-an-email" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = put_json(
        &app,
        &format!("/api/players/{}", Uuid::new_v4()),
        json!({ "location": "Delft" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["detail"], "Player not found");
}

#[tokio::test]
async fn club_profile_can_be_edited() {
    let app = app();
    let club = create_club(&app, "Hurley").await;
    create_club(&app, "Pinoke").await;
    let uri = format!("/api/clubs/{club}");

    let res = put_json(
        &app,
        &uri,
        json!({ "description": "Amstelveen", "established_year": 1935, "league": "Hoofdklasse" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["description"], "Amstelveen");
    assert_eq!(res.body["established_year"], 1935);
    assert_eq!(res.body["name"], "Hurley");

    let res = put_json(&app, &uri, json!({ "email": "pinoke@clubs.test" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["detail"], "Email already registered");

    let res = put_json(&app, &uri, json!({ "name": "   " })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = put_json(
        &app,
        &format!("/api/clubs/{}", Uuid::new_v4()),
        json!({ "location": "Delft" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["detail"], "Club not found");
}
