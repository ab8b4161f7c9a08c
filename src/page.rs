use std::fmt;

/// Every page the site can show. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Home,
    Services,
    Pricing,
    Contact,
    Login,
    Dashboard,
}

impl PageId {
    pub const ALL: [PageId; 6] = [
        PageId::Home,
        PageId::Services,
        PageId::Pricing,
        PageId::Contact,
        PageId::Login,
        PageId::Dashboard,
    ];

    /// Key used by navigation buttons (`data-page`).
    pub fn key(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::Services => "services",
            PageId::Pricing => "tarifs",
            PageId::Contact => "contact",
            PageId::Login => "login",
            PageId::Dashboard => "dashboard",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "home" => Some(PageId::Home),
            "services" => Some(PageId::Services),
            "tarifs" | "pricing" => Some(PageId::Pricing),
            "contact" => Some(PageId::Contact),
            "login" => Some(PageId::Login),
            "dashboard" => Some(PageId::Dashboard),
            _ => None,
        }
    }

    /// Unknown keys fall back to the home page rather than failing.
    pub fn resolve(key: &str) -> Self {
        Self::from_key(key).unwrap_or_default()
    }

    pub fn title(self) -> &'static str {
        match self {
            PageId::Home => "Accueil",
            PageId::Services => "Nos Services",
            PageId::Pricing => "Tarifs",
            PageId::Contact => "Contact",
            PageId::Login => "Espace client",
            PageId::Dashboard => "Tableau de bord",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back() {
        for page in PageId::ALL {
            assert_eq!(PageId::from_key(page.key()), Some(page));
        }
        assert_eq!(PageId::from_key("pricing"), Some(PageId::Pricing));
    }

    #[test]
    fn unknown_key_falls_back_to_home() {
        assert_eq!(PageId::resolve("blog"), PageId::Home);
        assert_eq!(PageId::resolve(""), PageId::Home);
        assert_eq!(PageId::resolve(" contact "), PageId::Contact);
    }
}
