use serde::{Deserialize, Serialize};

/// Pages of the dashboard, addressed by path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Search,
    Stock(String),
    Portfolio,
    Transactions,
    Optimization,
}

impl Route {
    /// Unknown paths land on the search page.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::Search,
            ["stock", symbol] => Self::Stock(symbol.to_ascii_uppercase()),
            ["portfolio"] => Self::Portfolio,
            ["transactions"] => Self::Transactions,
            ["optimization"] => Self::Optimization,
            _ => Self::Search,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Search => "/".to_string(),
            Self::Stock(symbol) => format!("/stock/{}", symbol),
            Self::Portfolio => "/portfolio".to_string(),
            Self::Transactions => "/transactions".to_string(),
            Self::Optimization => "/optimization".to_string(),
        }
    }

    pub fn stock_symbol(&self) -> Option<&str> {
        match self {
            Self::Stock(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths() {
        assert_eq!(Route::parse("/"), Route::Search);
        assert_eq!(Route::parse(""), Route::Search);
        assert_eq!(Route::parse("/stock/aapl"), Route::Stock("AAPL".into()));
        assert_eq!(Route::parse("/portfolio/"), Route::Portfolio);
        assert_eq!(Route::parse("/transactions"), Route::Transactions);
        assert_eq!(Route::parse("/optimization"), Route::Optimization);
    }

    #[test]
    fn unknown_paths_fall_back_to_search() {
        assert_eq!(Route::parse("/nope"), Route::Search);
        assert_eq!(Route::parse("/stock"), Route::Search);
        assert_eq!(Route::parse("/stock/AAPL/extra"), Route::Search);
    }

    #[test]
    fn path_parses_back() {
        for route in [
            Route::Search,
            Route::Stock("MSFT".into()),
            Route::Portfolio,
            Route::Transactions,
            Route::Optimization,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
