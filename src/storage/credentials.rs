//! Google service-account credential loading and client construction
//!
//! One credential blob (GOOGLE_JSON) authenticates both backends: the
//! Drive hub for folder/file storage and the Sheets hub for the
//! submissions log. The hubs share a single TLS client and authenticator
//! and are built once at startup, then handed to the workflow as
//! long-lived handles.

use google_drive3::{hyper_rustls, hyper_util, yup_oauth2, DriveHub};
use google_sheets4::Sheets;

use crate::core::error::AppResult;

/// Shared TLS connector type for both hubs
pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Drive hub handle
pub type Drive = DriveHub<HttpsConnector>;

/// Sheets hub handle
pub type SheetsHub = Sheets<HttpsConnector>;

/// Authenticated clients for the two Google backends
pub struct GoogleClients {
    pub drive: Drive,
    pub sheets: SheetsHub,
}

/// Builds authenticated Drive and Sheets hubs from a service-account key blob
///
/// # Arguments
/// * `service_account_json` - Raw JSON key as issued by the Google console
///
/// # Returns
/// * `Ok(GoogleClients)` - Both hubs ready for use
/// * `Err(AppError)` - Key parsing or TLS/authenticator setup failed
pub async fn build_clients(service_account_json: &str) -> AppResult<GoogleClients> {
    // Parse the key blob. Fails fast on malformed credentials so the
    // process aborts at startup instead of on the first submission.
    let key = yup_oauth2::parse_service_account_key(service_account_json)?;

    // TLS connector + HTTP client, shared by the authenticator and both hubs.
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_only()
        .enable_http2()
        .build();

    let client =
        hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

    // Service-account authenticator. We pass a custom client builder so
    // yup-oauth2 doesn't need its own TLS stack configured.
    let auth = yup_oauth2::ServiceAccountAuthenticator::with_client(
        key,
        yup_oauth2::client::CustomHyperClientBuilder::from(client.clone()),
    )
    .build()
    .await?;

    let drive = DriveHub::new(client.clone(), auth.clone());
    let sheets = Sheets::new(client, auth);

    Ok(GoogleClients { drive, sheets })
}
