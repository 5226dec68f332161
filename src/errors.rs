error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
        Request(::reqwest::Error);
    }

    errors {
        Validation(msg: String) {
            description("invalid request")
            display("{}", msg)
        }

        NotFound(msg: String) {
            description("not found")
            display("{}", msg)
        }

        Dependency(msg: String) {
            description("downstream service failed")
            display("{}", msg)
        }
    }
}

impl Error {
    /// HTTP status the error is surfaced as.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation(_) => 400,
            ErrorKind::NotFound(_) => 404,
            _ => 500,
        }
    }
}

pub fn dependency<E: std::fmt::Display>(context: &str, error: E) -> Error {
    ErrorKind::Dependency(format!("{}: {}", context, error)).into()
}
