use verusdesk_core::domain::currency::{project, project_mask, CurrencyOption, OptionSelection};

const ALL_MASKS: u32 = 1 << 12;

fn selected_by(mask: u32) -> Vec<CurrencyOption> {
    CurrencyOption::ALL.iter().copied().filter(|option| mask & option.bit() != 0).collect()
}

#[test]
fn mask_is_or_of_selected_bits() {
    for mask in 0..ALL_MASKS {
        let selected = selected_by(mask);
        let selection: OptionSelection = selected.iter().copied().collect();
        let expected = selected.iter().fold(0u32, |acc, option| acc | option.bit());
        assert_eq!(selection.mask(), expected, "mask {mask}");
        assert_eq!(project(&selection).mask, expected, "mask {mask}");
    }
}

#[test]
fn mask_round_trips_the_selection() {
    for mask in 0..ALL_MASKS {
        let selection: OptionSelection = selected_by(mask).into_iter().collect();
        let decoded = OptionSelection::from_mask(selection.mask());
        assert_eq!(decoded.selected(), selection.selected(), "mask {mask}");
        assert_eq!(decoded, selection);
    }
}

#[test]
fn token_gates_fractional_and_nft() {
    for mask in 0..ALL_MASKS {
        let projected = project_mask(mask);
        if !projected.is_token {
            assert!(!projected.is_fractional, "mask {mask}");
            assert!(!projected.is_nft, "mask {mask}");
        }
        assert_eq!(projected.show_notarization_reward, projected.is_pbaas || projected.is_gateway_converter, "mask {mask}");
    }
}

#[test]
fn bits_are_distinct_powers_of_two() {
    let mut seen = 0u32;
    for option in CurrencyOption::ALL {
        assert!(option.bit().is_power_of_two(), "{option}");
        assert_eq!(seen & option.bit(), 0, "{option} reuses a bit");
        seen |= option.bit();
    }
    assert_eq!(seen, ALL_MASKS - 1);
}
