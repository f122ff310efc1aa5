use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header},
};

use crate::{
    cart::{CART_COOKIE, CART_COOKIE_MAX_AGE_SECS, Cart},
    error::AppError,
};

/// Cart carried in the request's `cart` cookie. A missing or unreadable
/// cookie yields an empty cart.
#[derive(Debug, Clone, Default)]
pub struct CartCookie(pub Cart);

impl<S> FromRequestParts<S> for CartCookie
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(CartCookie(cart_from_headers(&parts.headers)))
    }
}

pub fn cart_from_headers(headers: &HeaderMap) -> Cart {
    let Some(raw) = find_cookie(headers, CART_COOKIE) else {
        return Cart::default();
    };
    match Cart::from_cookie_value(&raw) {
        Ok(cart) => cart,
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable cart cookie");
            Cart::default()
        }
    }
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// `Set-Cookie` value persisting `cart`.
pub fn cart_set_cookie(cart: &Cart, secure: bool) -> Result<HeaderValue, AppError> {
    let value = cart
        .to_cookie_value()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    build_cookie(&value, CART_COOKIE_MAX_AGE_SECS, secure)
}

/// `Set-Cookie` value that expires the cart cookie.
pub fn cart_clear_cookie(secure: bool) -> Result<HeaderValue, AppError> {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age: u64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{CART_COOKIE}={value}; Path=/; Max-Age={max_age}; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|err| AppError::Internal(anyhow::anyhow!("invalid cookie header: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use uuid::Uuid;

    fn sample_cart() -> Cart {
        Cart {
            items: vec![CartItem {
                product_id: Uuid::new_v4(),
                variation_id: None,
                name: "Gyokuro".into(),
                slug: "gyokuro".into(),
                sku: None,
                quantity: 2,
                unit_price: 45_000,
                discount: None,
                max_stock: Some(5),
                attributes: vec![],
            }],
        }
    }

    #[test]
    fn reads_the_cart_among_other_cookies() {
        let cart = sample_cart();
        let mut headers = HeaderMap::new();
        let cookie = format!("theme=dark; cart={}; lang=cs", cart.to_cookie_value().unwrap());
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        assert_eq!(cart_from_headers(&headers), cart);
    }

    #[test]
    fn garbage_cookie_reads_as_empty_cart() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("cart=not-a-cart"));
        assert!(cart_from_headers(&headers).is_empty());
        assert!(cart_from_headers(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn set_cookie_carries_attributes() {
        let header = cart_set_cookie(&sample_cart(), true).unwrap();
        let text = header.to_str().unwrap();
        assert!(text.starts_with("cart="));
        assert!(text.contains("Path=/"));
        assert!(text.contains("Max-Age=2592000"));
        assert!(text.ends_with("; Secure"));

        let cleared = cart_clear_cookie(false).unwrap();
        assert_eq!(cleared.to_str().unwrap(), "cart=; Path=/; Max-Age=0; SameSite=Lax");
    }
}
