use std::fmt;
use std::str::FromStr;

/// Named identity lists kept by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListName {
    Whitelist,
    Blacklist,
    Mute,
}

impl ListName {
    pub const ALL: [ListName; 3] = [ListName::Whitelist, ListName::Blacklist, ListName::Mute];

    /// Store key holding the list
    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Whitelist => "whitelist",
            ListName::Blacklist => "blacklist",
            ListName::Mute => "mute",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListName::ALL
            .into_iter()
            .find(|list| list.as_str() == s)
            .ok_or_else(|| format!("unknown list: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_name_round_trip() {
        for list in ListName::ALL {
            assert_eq!(list.as_str().parse::<ListName>(), Ok(list));
        }
        assert!("friends".parse::<ListName>().is_err());
    }
}
