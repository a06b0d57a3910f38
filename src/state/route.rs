/// Navigational context
///
/// A shareable reference of the form `/?photoId=5`. The lightbox is open
/// exactly when the current route carries a photo id.
use std::fmt;
use std::str::FromStr;

const PHOTO_PARAM: &str = "photoId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Route {
    pub photo_id: Option<usize>,
}

impl Route {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn photo(id: usize) -> Self {
        Self { photo_id: Some(id) }
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    /// Accepts `/?photoId=5`, `?photoId=5`, `photoId=5` and full URLs.
    /// Anything unparseable is the root route.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.split('#').next().unwrap_or_default();
        let query = match s.split_once('?') {
            Some((_, query)) => query,
            None => s,
        };

        let photo_id = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == PHOTO_PARAM)
            .and_then(|(_, value)| value.trim().parse().ok());

        Ok(Self { photo_id })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.photo_id {
            Some(id) => write!(f, "/?{PHOTO_PARAM}={id}"),
            None => write!(f, "/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        for input in ["/?photoId=5", "?photoId=5", "photoId=5", "https://photos.example.com/?x=1&photoId=5#top"] {
            assert_eq!(input.parse::<Route>().unwrap(), Route::photo(5), "{input}");
        }
    }

    #[test]
    fn test_parse_root_and_garbage() {
        for input in ["/", "", "?photoId=", "?photoId=abc", "?photoId=-1", "?other=3"] {
            assert_eq!(input.parse::<Route>().unwrap(), Route::root(), "{input}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Route::photo(12).to_string(), "/?photoId=12");
        assert_eq!(Route::root().to_string(), "/");
        assert_eq!(Route::photo(7).to_string().parse::<Route>().unwrap(), Route::photo(7));
    }
}
