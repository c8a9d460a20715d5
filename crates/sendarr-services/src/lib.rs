pub mod http;
pub mod radarr;
pub mod sonarr;
pub mod trakt;

pub use http::{ApiRequest, HttpClient, HttpError, Method, RawResponse, ReqwestTransport, Transport};
