//! Browser [`PlatformAuthenticator`] over `navigator.credentials`.
//!
//! Options objects are assembled with `js_sys::Reflect` so the binding does not
//! depend on web-sys' unstable credential bindings. A `NotAllowedError` from the
//! browser (dismissed prompt or timeout) maps to [`PlatformError::NotAllowed`].

use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::biometric::{
    device_name_from_user_agent, AssertionOptions, CreatedCredential, CreationOptions,
    PlatformAuthenticator, PlatformError,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct WebAuthenticator;

fn platform_err(err: JsValue) -> PlatformError {
    let name = Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    if name.as_deref() == Some("NotAllowedError") {
        PlatformError::NotAllowed
    } else {
        PlatformError::Other(format!("{err:?}"))
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), PlatformError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(platform_err)
}

fn bytes(data: &[u8]) -> JsValue {
    Uint8Array::from(data).into()
}

fn credentials() -> Result<JsValue, PlatformError> {
    let window = web_sys::window().ok_or_else(|| PlatformError::Other("no window".into()))?;
    let creds = Reflect::get(&window.navigator(), &JsValue::from_str("credentials"))
        .map_err(platform_err)?;
    if creds.is_undefined() || creds.is_null() {
        return Err(PlatformError::Other("navigator.credentials unavailable".into()));
    }
    Ok(creds)
}

/// Call `target[method](arg)` and await the returned promise.
async fn call_async(target: &JsValue, method: &str, arg: Option<&JsValue>) -> Result<JsValue, PlatformError> {
    let func: Function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(platform_err)?
        .dyn_into()
        .map_err(platform_err)?;
    let ret = match arg {
        Some(a) => func.call1(target, a),
        None => func.call0(target),
    }
    .map_err(platform_err)?;
    let promise: Promise = ret.dyn_into().map_err(platform_err)?;
    JsFuture::from(promise).await.map_err(platform_err)
}

fn authenticator_selection() -> Result<Object, PlatformError> {
    let sel = Object::new();
    set(&sel, "authenticatorAttachment", &JsValue::from_str("platform"))?;
    set(&sel, "userVerification", &JsValue::from_str("required"))?;
    set(&sel, "requireResidentKey", &JsValue::FALSE)?;
    Ok(sel)
}

impl PlatformAuthenticator for WebAuthenticator {
    fn is_supported(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let has_pkc = Reflect::get(&window, &JsValue::from_str("PublicKeyCredential"))
            .map(|v| !v.is_undefined())
            .unwrap_or(false);
        has_pkc && credentials().is_ok()
    }

    async fn is_platform_authenticator_available(&self) -> Result<bool, PlatformError> {
        let window = web_sys::window().ok_or_else(|| PlatformError::Other("no window".into()))?;
        let pkc = Reflect::get(&window, &JsValue::from_str("PublicKeyCredential"))
            .map_err(platform_err)?;
        let available =
            call_async(&pkc, "isUserVerifyingPlatformAuthenticatorAvailable", None).await?;
        Ok(available.as_bool().unwrap_or(false))
    }

    async fn create(&self, options: &CreationOptions) -> Result<CreatedCredential, PlatformError> {
        let window = web_sys::window().ok_or_else(|| PlatformError::Other("no window".into()))?;
        let hostname = window.location().hostname().map_err(platform_err)?;

        let rp = Object::new();
        set(&rp, "name", &JsValue::from_str(&options.rp_name))?;
        set(&rp, "id", &JsValue::from_str(&hostname))?;

        let user = Object::new();
        set(&user, "id", &bytes(options.user_id.as_bytes()))?;
        set(&user, "name", &JsValue::from_str(&options.user_name))?;
        set(&user, "displayName", &JsValue::from_str(&options.user_name))?;

        let params = Array::new();
        for alg in &options.algorithms {
            let p = Object::new();
            set(&p, "alg", &JsValue::from(*alg))?;
            set(&p, "type", &JsValue::from_str("public-key"))?;
            params.push(&p);
        }

        let public_key = Object::new();
        set(&public_key, "challenge", &bytes(&options.challenge))?;
        set(&public_key, "rp", &rp)?;
        set(&public_key, "user", &user)?;
        set(&public_key, "pubKeyCredParams", &params)?;
        set(&public_key, "authenticatorSelection", &authenticator_selection()?)?;
        set(&public_key, "timeout", &JsValue::from(options.timeout_ms))?;
        set(&public_key, "attestation", &JsValue::from_str("none"))?;

        let request = Object::new();
        set(&request, "publicKey", &public_key)?;

        let credential = call_async(&credentials()?, "create", Some(&request)).await?;
        if credential.is_null() || credential.is_undefined() {
            return Err(PlatformError::Other("Failed to create credential".into()));
        }

        let id = Reflect::get(&credential, &JsValue::from_str("id"))
            .map_err(platform_err)?
            .as_string()
            .unwrap_or_default();
        let raw = Reflect::get(&credential, &JsValue::from_str("rawId")).map_err(platform_err)?;
        Ok(CreatedCredential {
            id,
            raw_id: Uint8Array::new(&raw).to_vec(),
        })
    }

    async fn get(&self, options: &AssertionOptions) -> Result<(), PlatformError> {
        let allowed = Object::new();
        set(&allowed, "id", &bytes(&options.allow_credential))?;
        set(&allowed, "type", &JsValue::from_str("public-key"))?;
        set(&allowed, "transports", &Array::of1(&JsValue::from_str("internal")))?;

        let public_key = Object::new();
        set(&public_key, "challenge", &bytes(&options.challenge))?;
        set(&public_key, "allowCredentials", &Array::of1(&allowed))?;
        set(&public_key, "timeout", &JsValue::from(options.timeout_ms))?;
        set(&public_key, "userVerification", &JsValue::from_str("required"))?;

        let request = Object::new();
        set(&request, "publicKey", &public_key)?;

        let assertion = call_async(&credentials()?, "get", Some(&request)).await?;
        if assertion.is_null() || assertion.is_undefined() {
            return Err(PlatformError::Other("Authentication failed".into()));
        }
        Ok(())
    }

    fn device_name(&self) -> String {
        let ua = web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();
        device_name_from_user_agent(&ua).to_string()
    }
}
