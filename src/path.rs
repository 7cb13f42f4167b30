use std::path::{PathBuf, Path, Component};
use std::io::ErrorKind;

/// what, if anything, exists at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Missing,
    File,
    Dir,
    Other,
}

pub fn kind<P>(path: P) -> Result<Kind, std::io::Error>
where
    P: AsRef<Path>
{
    match path.as_ref().metadata() {
        Ok(m) => if m.is_file() {
            Ok(Kind::File)
        } else if m.is_dir() {
            Ok(Kind::Dir)
        } else {
            Ok(Kind::Other)
        },
        Err(err) => match err.kind() {
            ErrorKind::NotFound => Ok(Kind::Missing),
            _ => Err(err)
        }
    }
}

/// joins a relative path onto base and collapses "." and ".." segments
/// without touching the file system. absolute paths are returned as is
pub fn resolve<B, G>(base: B, given: G) -> PathBuf
where
    B: AsRef<Path>,
    G: AsRef<Path>,
{
    let given = given.as_ref();

    if given.is_absolute() {
        return given.to_path_buf();
    }

    let mut rtn = PathBuf::new();

    for comp in base.as_ref().components().chain(given.components()) {
        match comp {
            Component::ParentDir => {
                rtn.pop();
            }
            Component::CurDir => {}
            other => {
                rtn.push(other.as_os_str());
            }
        }
    }

    rtn
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_collapses_segments() {
        assert_eq!(
            resolve("/srv/assist/config", "../templates/./pages"),
            PathBuf::from("/srv/assist/templates/pages")
        );
    }

    #[test]
    fn resolve_keeps_absolute() {
        assert_eq!(
            resolve("/srv/assist", "/var/lib/assist"),
            PathBuf::from("/var/lib/assist")
        );
    }

    #[test]
    fn kinds() {
        let dir = std::env::temp_dir();

        assert_eq!(kind(&dir).unwrap(), Kind::Dir);
        assert_eq!(kind(dir.join("assist_should_not_exist")).unwrap(), Kind::Missing);
    }
}
