use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use xmr_order_engine::{
    traits::{LedgerError, OrderStoreError, RateStoreError},
    OrderFlowError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Order error. {0}")]
    OrderFlow(#[from] OrderFlowError),
    #[error("Exchange rate error. {0}")]
    Rate(#[from] RateStoreError),
    #[error("Wallet error. {0}")]
    Ledger(#[from] LedgerError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderFlow(e) => match e {
                OrderFlowError::Rate(RateStoreError::NoRateAvailable) => StatusCode::SERVICE_UNAVAILABLE,
                OrderFlowError::EmptyOrder
                | OrderFlowError::ItemNotSellable(_)
                | OrderFlowError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                OrderFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderFlowError::Store(OrderStoreError::Transition(_))
                | OrderFlowError::Store(OrderStoreError::ConcurrentModification) => StatusCode::CONFLICT,
                OrderFlowError::Ledger(LedgerError::UnknownAddress(_)) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Rate(RateStoreError::NoRateAvailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Rate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Ledger(LedgerError::UnknownAddress(_)) => StatusCode::NOT_FOUND,
            Self::Ledger(LedgerError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.client_message() }).to_string())
    }
}

impl ServerError {
    /// What the client gets to see. Internal failures are logged with detail but reported
    /// generically.
    fn client_message(&self) -> String {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!("Internal error served as {status}: {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use xmr_order_engine::db_types::{OrderState, TransitionError};

    #[test]
    fn the_error_taxonomy_maps_to_status_codes() {
        let no_rate = ServerError::OrderFlow(OrderFlowError::Rate(RateStoreError::NoRateAvailable));
        assert_eq!(no_rate.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let bad_item = ServerError::OrderFlow(OrderFlowError::ItemNotSellable(3));
        assert_eq!(bad_item.status_code(), StatusCode::BAD_REQUEST);

        let conflict = ServerError::OrderFlow(OrderFlowError::Store(
            TransitionError::InvalidTransition { from: OrderState::Created, to: OrderState::Purchased }.into(),
        ));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let unknown = ServerError::Ledger(LedgerError::UnknownAddress("9xog".into()));
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

        let backend = ServerError::BackendError("secret detail".into());
        assert_eq!(backend.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_detail_is_not_echoed_to_clients() {
        let backend = ServerError::BackendError("connection string with password".into());
        assert_eq!(backend.client_message(), "internal server error");

        let no_rate = ServerError::Rate(RateStoreError::NoRateAvailable);
        assert!(no_rate.client_message().contains("No exchange rate"));
    }
}
