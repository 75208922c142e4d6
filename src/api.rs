//! HTTP surface over the store and the add-product workflow

use axum::{extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{delete, get, post}, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::{Product, ProductId, Shop};
use crate::store::StoreHandle;
use crate::workflow::{AddProductWorkflow, ProductForm, Submission};
use crate::ShoppingError;

#[derive(Clone)]
pub struct AppState { pub store: StoreHandle }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "shopping-list"})) }))
        .route("/api/v1/shops", get(list_shops))
        .route("/api/v1/shops/:id", get(get_shop))
        .route("/api/v1/shops/:id/products", get(list_shop_products))
        .route("/api/v1/products", get(list_products).post(add_product))
        .route("/api/v1/products/:id", delete(remove_product))
        .route("/api/v1/products/:id/receive", post(toggle_received))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

impl IntoResponse for ShoppingError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ShopNotFound(_) | Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::FormDisabled | Self::MissingTotalsSnapshot(_) | Self::TotalsUnderflow(_) | Self::TotalsOverflow(_) => StatusCode::CONFLICT,
            Self::StoreClosed => StatusCode::SERVICE_UNAVAILABLE,
            Self::Asset(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            Self::InvalidForm(violations) => json!({"error": self.to_string(), "violations": violations}),
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ShoppingError>;

async fn list_shops(State(s): State<AppState>) -> ApiResult<Json<Vec<Shop>>> { Ok(Json(s.store.shops().await?)) }

async fn get_shop(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Shop>> { Ok(Json(s.store.shop(&id).await?)) }

async fn list_shop_products(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Product>>> {
    let state = s.store.snapshot().await?;
    state.shop(&id).ok_or_else(|| ShoppingError::ShopNotFound(id.clone()))?;
    Ok(Json(state.products_for_shop(&id).cloned().collect()))
}

async fn list_products(State(s): State<AppState>) -> ApiResult<Json<Vec<Product>>> { Ok(Json(s.store.products().await?)) }

async fn add_product(State(s): State<AppState>, Json(form): Json<ProductForm>) -> ApiResult<(StatusCode, Json<Submission>)> {
    let mut workflow = AddProductWorkflow::open(&s.store);
    workflow.fill(form)?;
    let submission = workflow.submit().await;
    workflow.close();
    Ok((StatusCode::CREATED, Json(submission?)))
}

async fn remove_product(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    s.store.remove_product(ProductId::from(id.as_str())).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_received(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    Ok(Json(s.store.toggle_received(ProductId::from(id.as_str())).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetSource, InitialData};
    use crate::store::ShoppingStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> Router {
        let state = InitialData::load(&AssetSource::Bundled).await.unwrap().into_state();
        router(AppState { store: ShoppingStore::spawn(state, 8) })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    #[tokio::test]
    async fn test_list_shops() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/api/v1/shops", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[2]["totalProducts"], 1);
    }

    #[tokio::test]
    async fn test_add_product_updates_shop() {
        let app = app().await;
        let form = json!({"name": "Footrest", "shopId": "s3", "priceUSD": 10, "deliveryEstDate": "2021-02-01"});
        let (status, body) = send(&app, "POST", "/api/v1/products", Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["product"]["received"], false);
        assert_eq!(body["changes"]["totalProducts"], 2);

        let (_, shop) = send(&app, "GET", "/api/v1/shops/s3", None).await;
        assert_eq!(shop["totalProducts"], 2);
        assert_eq!(shop["totalValue"]["USD"], 25.0);

        let (_, products) = send(&app, "GET", "/api/v1/shops/s3/products", None).await;
        assert_eq!(products.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_consecutive_adds_accumulate() {
        let app = app().await;
        let form = json!({"name": "Coaster", "shopId": "s1", "priceUSD": 2, "deliveryEstDate": "2021-02-01"});
        for _ in 0..2 {
            let (status, _) = send(&app, "POST", "/api/v1/products", Some(form.clone())).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (_, shop) = send(&app, "GET", "/api/v1/shops/s1", None).await;
        assert_eq!(shop["totalProducts"], 4);
    }

    #[tokio::test]
    async fn test_add_product_rejections() {
        let app = app().await;
        let (status, body) = send(&app, "POST", "/api/v1/products", Some(json!({"name": "", "shopId": "s1"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"].as_array().unwrap().len(), 3);

        let form = json!({"name": "Rug", "shopId": "s42", "priceUSD": 80, "deliveryEstDate": "2021-02-01"});
        let (status, _) = send(&app, "POST", "/api/v1/products", Some(form)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_receive_and_remove() {
        let app = app().await;
        let (status, product) = send(&app, "POST", "/api/v1/products/p1606953600000/receive", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["received"], true);
        let (_, shop) = send(&app, "GET", "/api/v1/shops/s2", None).await;
        assert_eq!(shop["totalReceivedProducts"], 2);

        let (status, _) = send(&app, "DELETE", "/api/v1/products/p1606953600000", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, shop) = send(&app, "GET", "/api/v1/shops/s2", None).await;
        assert_eq!(shop["totalProducts"], 1);
        assert_eq!(shop["totalReceivedProducts"], 1);

        let (status, _) = send(&app, "DELETE", "/api/v1/products/p1606953600000", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
