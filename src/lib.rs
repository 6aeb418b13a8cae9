pub mod config;
pub mod error;
pub mod pddl;
pub mod validator;

pub use config::ValidatorConfig;
pub use error::{Error, Result};
pub use pddl::{Domain, Plan, Problem, State};
pub use validator::{validate, validate_files, validate_text, Report, Verdict};

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

unsafe fn text_argument<'a>(arg: *const c_char, what: &str) -> Result<&'a str> {
    if arg.is_null() {
        return Err(Error::structural(format!("{} is a null pointer", what)));
    }
    CStr::from_ptr(arg).to_str().map_err(|e| Error::structural(format!("{} is not valid UTF-8: {}", what, e)))
}

unsafe fn validate_json(domain: *const c_char, problem: *const c_char, plan: *const c_char) -> Result<String> {
    let report = validate_text(
        text_argument(domain, "domain")?,
        text_argument(problem, "problem")?,
        text_argument(plan, "plan")?,
        &ValidatorConfig::default(),
    )?;
    Ok(serde_json::to_string(&report)?)
}

/// Validates a plan given the PDDL text of domain, problem and plan.
///
/// Returns a JSON report, or `{"error": ...}` when the inputs cannot be
/// validated. The string must be released with [`pddl_free_string`].
///
/// # Safety
/// Every argument must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pddl_validate_json(domain: *const c_char, problem: *const c_char, plan: *const c_char) -> *mut c_char {
    let json = match validate_json(domain, problem, plan) {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e.to_string(), "kind": e.kind() }).to_string(),
    };
    CString::new(json).map(CString::into_raw).unwrap_or(ptr::null_mut())
}

/// # Safety
/// `s` must come from [`pddl_validate_json`] and not have been freed.
#[no_mangle]
pub unsafe extern "C" fn pddl_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
