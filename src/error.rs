use std::borrow::Cow;

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// failures outside of request handling: startup, config, jobs
#[derive(Debug)]
pub struct Error {
    kind: Cow<'static, str>,
    msg: Option<String>,
    src: Option<BoxDynError>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new() -> Error {
        Error {
            kind: Cow::Borrowed("Error"),
            msg: None,
            src: None,
        }
    }

    pub fn kind<K>(mut self, kind: K) -> Self
    where
        K: Into<Cow<'static, str>>
    {
        self.kind = kind.into();
        self
    }

    pub fn message<M>(mut self, msg: M) -> Error
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn source<S>(mut self, src: S) -> Error
    where
        S: Into<BoxDynError>
    {
        self.src = Some(src.into());
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kind)?;

        if let Some(msg) = &self.msg {
            write!(f, ": {msg}")?;
        }

        if let Some(err) = &self.src {
            if self.msg.is_some() {
                write!(f, "\n{err}")?;
            } else {
                write!(f, ": {err}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.src.as_ref().map(|v| & **v as _)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new().message(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new().message(msg)
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(e) => Self::from(e),
            other => Error::new()
                .kind("PoolError")
                .message("failed to retrieve database connection")
                .source(other)
        }
    }
}

impl From<hkdf::InvalidLength> for Error {
    fn from(_err: hkdf::InvalidLength) -> Self {
        Error::new()
            .kind("KDFExpandFailed")
            .message("invalid output length when deriving key")
    }
}

macro_rules! from_source {
    ($k:literal, $e:path) => {
        impl From<$e> for Error {
            fn from(err: $e) -> Self {
                Error::new()
                    .kind($k)
                    .source(err)
            }
        }
    };
}

from_source!("IoError", std::io::Error);
from_source!("AddrParseError", std::net::AddrParseError);
from_source!("TemplateError", handlebars::TemplateError);
from_source!("DatabaseError", tokio_postgres::Error);
from_source!("JsonError", serde_json::Error);
from_source!("YamlError", serde_yaml::Error);
from_source!("CronError", cron::error::Error);

assist_lib::context_trait!(Error);

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<BoxDynError>
{
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.map_err(|err| Error::new()
            .message(cxt)
            .source(err))
    }
}

impl<T> Context<T, ()> for std::option::Option<T> {
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.ok_or_else(|| Error::new().message(cxt))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn option_context() {
        let err = None::<()>.context("missing value").unwrap_err();

        assert_eq!(err.to_string(), "Error: missing value");
    }

    #[test]
    fn result_context_keeps_source() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone"
        ));
        let err = result.context("failed to open").unwrap_err();

        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Error: failed to open\ngone");
    }

    #[test]
    fn converted_source_names_kind() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));

        assert_eq!(err.to_string(), "IoError: disk");
    }
}
