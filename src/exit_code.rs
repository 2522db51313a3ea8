use crate::error::CkeditError;

pub fn exit_code_for_error(err: &CkeditError) -> i32 {
    match err {
        CkeditError::Config(_) => 2,
        CkeditError::InvalidUrl(_) => 3,
        CkeditError::UnknownDomain(_) => 6,
        CkeditError::Io(_) => 23,
        CkeditError::Json(_) => 26,
        CkeditError::PermissionDenied(_) | CkeditError::FileNotFound(_) => 37,
        CkeditError::Store(_) | CkeditError::AlreadyListening => 43,
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::CkeditError;

    #[test]
    fn exit_code_maps_invalid_url() {
        let err = CkeditError::InvalidUrl("bad".to_string());
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_maps_missing_file() {
        let err = CkeditError::FileNotFound("cookies.txt".to_string());
        assert_eq!(exit_code_for_error(&err), 37);
    }

    #[test]
    fn exit_code_maps_unknown_domain() {
        let err = CkeditError::UnknownDomain("x.com".to_string());
        assert_eq!(exit_code_for_error(&err), 6);
    }
}
