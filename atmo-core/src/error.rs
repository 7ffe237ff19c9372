use thiserror::Error;

/// Remote service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Forecast,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Geocoding => "geocoding",
            Service::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a lookup. A city that simply does not exist is not an error,
/// see [`crate::Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Failed to send {service} request: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: Service,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {service} response: {message}")]
    Parse { service: Service, message: String },
}

impl LookupError {
    pub fn parse<S: Into<String>>(service: Service, message: S) -> Self {
        LookupError::Parse {
            service,
            message: message.into(),
        }
    }

    pub fn service(&self) -> Service {
        match self {
            LookupError::Transport { service, .. }
            | LookupError::Status { service, .. }
            | LookupError::Parse { service, .. } => *service,
        }
    }

    /// Connection problems and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport { .. } | LookupError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LookupError::Parse { .. })
    }
}
