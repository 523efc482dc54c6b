//! Caller-facing text for classified failures

use qr_types::{ErrorReason, MinAmountHint};

pub fn failure_message(
	reason: ErrorReason,
	hint: Option<&MinAmountHint>,
	unfixable: bool,
) -> String {
	match reason {
		ErrorReason::MinAmount => match hint {
			Some(hint) => match hint.usd_estimate {
				Some(usd) => format!(
					"Amount too small. Minimum is {} (~${:.2}).",
					hint.formatted, usd
				),
				None => format!("Amount too small. Minimum is {}.", hint.formatted),
			},
			None => "Amount too small for this route. Try a larger amount.".to_string(),
		},
		ErrorReason::NoLiquidity if unfixable => {
			"No route available: transfer-tax tokens cannot be routed.".to_string()
		},
		ErrorReason::NoLiquidity => "No liquidity available for this pair right now.".to_string(),
		ErrorReason::Timeout => "Quote request timed out. Please try again.".to_string(),
		ErrorReason::Other => "Unable to get a quote for this pair.".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use qr_types::Amount;

	#[test]
	fn test_min_amount_with_hint() {
		let hint = MinAmountHint {
			min_amount: Amount::from(2_500_000u64),
			formatted: "2.5".to_string(),
			usd_estimate: Some(5.0),
		};
		assert_eq!(
			failure_message(ErrorReason::MinAmount, Some(&hint), false),
			"Amount too small. Minimum is 2.5 (~$5.00)."
		);
	}

	#[test]
	fn test_messages_never_echo_provider_text() {
		for reason in [
			ErrorReason::MinAmount,
			ErrorReason::NoLiquidity,
			ErrorReason::Timeout,
			ErrorReason::Other,
		] {
			let message = failure_message(reason, None, false);
			assert!(!message.is_empty());
			assert!(!message.contains('{'));
		}
	}
}
