//! Request construction: the headers a browser XHR to the API would carry.

use crate::api::ApiRequest;
use crate::config::ApiConfig;
use crate::token::SessionToken;

pub fn build_request(api: &ApiConfig, token: &SessionToken, item_id: &str) -> ApiRequest {
    let mut headers = vec![
        (
            "Accept".to_string(),
            "application/json, text/javascript, */*; q=0.01".to_string(),
        ),
        (
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
        ),
        ("Origin".to_string(), api.origin.clone()),
        ("Referer".to_string(), api.page_url.clone()),
        ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
        (api.token_header.clone(), token.value.clone()),
    ];
    if let Some(cookie) = &token.cookie {
        headers.push(("Cookie".to_string(), cookie.clone()));
    }
    ApiRequest {
        url: api.url.clone(),
        headers,
        form: vec![(api.item_field.clone(), item_id.to_string())],
    }
}
