//! Customer-facing labels (French storefront).

use rust_decimal::Decimal;

use crate::directory::DirectoryKind;
use crate::fee_book::FeeState;

pub const SESSION_EXPIRED_NOTICE: &str = "Votre session a expiré. Veuillez vous reconnecter.";

#[must_use]
pub fn empty_directory_notice(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Stores => "Aucun magasin disponible.",
        DirectoryKind::RelayPoints => "Aucun point relais disponible.",
    }
}

/// Amount in dinars with millimes, e.g. `7.500 DT`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(3);
    rounded.rescale(3);
    format!("{rounded} DT")
}

#[must_use]
pub fn fee_label(state: FeeState) -> String {
    match state {
        FeeState::NotRequested => "-".to_owned(),
        FeeState::Pending => "Calcul…".to_owned(),
        FeeState::Resolved(Some(fee)) if fee.is_zero() => "Gratuit".to_owned(),
        FeeState::Resolved(Some(fee)) => format_amount(fee),
        FeeState::Resolved(None) | FeeState::Failed => "Indisponible".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fee_is_free() {
        assert_eq!(fee_label(FeeState::Resolved(Some(Decimal::ZERO))), "Gratuit");
        assert_eq!(
            fee_label(FeeState::Resolved(Some(Decimal::new(0, 3)))),
            "Gratuit"
        );
    }

    #[test]
    fn amounts_use_three_decimals() {
        assert_eq!(
            fee_label(FeeState::Resolved(Some(Decimal::from(7)))),
            "7.000 DT"
        );
        assert_eq!(
            fee_label(FeeState::Resolved(Some(Decimal::new(65, 1)))),
            "6.500 DT"
        );
        assert_eq!(format_amount(Decimal::new(12_3456, 4)), "12.346 DT");
    }

    #[test]
    fn unknown_fees_have_placeholders() {
        assert_eq!(fee_label(FeeState::Pending), "Calcul…");
        assert_eq!(fee_label(FeeState::Failed), "Indisponible");
        assert_eq!(fee_label(FeeState::Resolved(None)), "Indisponible");
        assert_eq!(fee_label(FeeState::NotRequested), "-");
    }

    #[test]
    fn empty_notices_name_the_list() {
        assert!(empty_directory_notice(DirectoryKind::RelayPoints).contains("point relais"));
        assert!(empty_directory_notice(DirectoryKind::Stores).contains("magasin"));
    }
}
