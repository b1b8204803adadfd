use super::Parser;
use crate::domain_model::UserId;

/// Look up usernames by numeric user id.
#[derive(Parser, Debug)]
#[command(name = "user-lookup")]
pub struct Cli {
    /// Settings file; defaults to settings/dev.toml (debug) or settings/release.toml.
    #[arg(long)]
    pub settings: Option<String>,

    /// User id to resolve. May be repeated.
    #[arg(long = "id", value_name = "ID", required = true)]
    pub ids: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one_id_is_required() {
        assert!(Cli::try_parse_from(["user-lookup"]).is_err());
    }

    #[test]
    fn ids_are_collected_in_order() {
        let cli = Cli::try_parse_from(["user-lookup", "--id", "3", "--id", "1"]).unwrap();
        assert_eq!(cli.ids, vec![UserId(3), UserId(1)]);
        assert_eq!(cli.settings, None);
    }
}
