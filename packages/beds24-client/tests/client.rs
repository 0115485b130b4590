// HTTP-level tests against a local mock of the Beds24 API.
use beds24_client::{Beds24Client, Beds24Error, ClientConfig};
use chrono::NaiveDate;
use mockito::{Matcher, Server};

fn client_for(server: &Server) -> Beds24Client {
    let config = ClientConfig::new("test-token").with_base_url(server.url());
    Beds24Client::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_properties_sends_token_and_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/properties")
        .match_header("token", "test-token")
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"type":"property","count":2,
                "pages":{"nextPageExists":false,"nextPageLink":null},
                "data":[{"id":101,"name":"Lakeside"},{"id":102}]}"#,
        )
        .create_async()
        .await;

    let page = client_for(&server).list_properties(3).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 2);
    assert_eq!(page.data[0].id, 101);
    assert_eq!(page.data[0].name.as_deref(), Some("Lakeside"));
    assert_eq!(page.data[1].name, None);
}

#[tokio::test]
async fn test_booking_reviews_query_and_rate_limit_headers() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/channels/booking/reviews")
        .match_header("token", "test-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("propertyId".into(), "101".into()),
            Matcher::UrlEncoded("from".into(), "2023-06-01".into()),
        ]))
        .with_status(200)
        .with_header("x-fivemincreditlimit-remaining", "88")
        .with_header("x-requestcost", "1")
        .with_body(
            r#"{"success":true,"data":[
                {"reviewId":"a","createdTimestamp":"2023-06-02T08:00:00Z","score":8}
            ]}"#,
        )
        .create_async()
        .await;

    let from = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let page = client_for(&server).booking_reviews(101, from).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 1);
    assert_eq!(page.data[0].review_id(), "a");
    assert_eq!(page.rate_limit.credit_remaining, Some(88));
    assert_eq!(page.rate_limit.request_cost, Some(1));
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/properties")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("credit limit exceeded")
        .create_async()
        .await;

    let err = client_for(&server).list_properties(1).await.unwrap_err();

    match err {
        Beds24Error::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "credit limit exceeded");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_api_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/properties")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success":false,"error":"Token is missing"}"#)
        .create_async()
        .await;

    let err = client_for(&server).list_properties(1).await.unwrap_err();

    assert!(matches!(
        err,
        Beds24Error::Api { status: 200, ref message } if message == "Token is missing"
    ));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/properties")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server).list_properties(1).await.unwrap_err();

    assert!(matches!(err, Beds24Error::Parse(_)));
}
