//! Currency option bits and the projection from a selection to active parameter groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One documented `definecurrency` option bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyOption {
    Fractional,
    RestrictedIdIssuance,
    IdStaking,
    IdReferrals,
    IdReferralRequired,
    Token,
    SingleCurrency,
    Gateway,
    #[serde(rename = "pbaas")]
    PBaaS,
    GatewayConverter,
    GatewayNameController,
    NftToken,
}

/// Conditional parameter groups gated by the option mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    Token,
    Fractional,
    #[serde(rename = "pbaas")]
    PBaaS,
    /// Notary-bearing parameters shared by PBaaS chains and gateways.
    Gateway,
    Nft,
}

impl CurrencyOption {
    pub const ALL: [CurrencyOption; 12] = [
        CurrencyOption::Fractional,
        CurrencyOption::RestrictedIdIssuance,
        CurrencyOption::IdStaking,
        CurrencyOption::IdReferrals,
        CurrencyOption::IdReferralRequired,
        CurrencyOption::Token,
        CurrencyOption::SingleCurrency,
        CurrencyOption::Gateway,
        CurrencyOption::PBaaS,
        CurrencyOption::GatewayConverter,
        CurrencyOption::GatewayNameController,
        CurrencyOption::NftToken,
    ];

    pub const fn bit(self) -> u32 {
        match self {
            CurrencyOption::Fractional => 1,
            CurrencyOption::RestrictedIdIssuance => 2,
            CurrencyOption::IdStaking => 4,
            CurrencyOption::IdReferrals => 8,
            CurrencyOption::IdReferralRequired => 16,
            CurrencyOption::Token => 32,
            CurrencyOption::SingleCurrency => 64,
            CurrencyOption::Gateway => 128,
            CurrencyOption::PBaaS => 256,
            CurrencyOption::GatewayConverter => 512,
            CurrencyOption::GatewayNameController => 1024,
            CurrencyOption::NftToken => 2048,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CurrencyOption::Fractional => "fractional",
            CurrencyOption::RestrictedIdIssuance => "restricted_id_issuance",
            CurrencyOption::IdStaking => "id_staking",
            CurrencyOption::IdReferrals => "id_referrals",
            CurrencyOption::IdReferralRequired => "id_referral_required",
            CurrencyOption::Token => "token",
            CurrencyOption::SingleCurrency => "single_currency",
            CurrencyOption::Gateway => "gateway",
            CurrencyOption::PBaaS => "pbaas",
            CurrencyOption::GatewayConverter => "gateway_converter",
            CurrencyOption::GatewayNameController => "gateway_name_controller",
            CurrencyOption::NftToken => "nft_token",
        }
    }

    /// Options that must also be selected for this one to take effect.
    pub const fn requires(self) -> &'static [CurrencyOption] {
        match self {
            CurrencyOption::Fractional | CurrencyOption::NftToken => &[CurrencyOption::Token],
            CurrencyOption::IdReferralRequired => &[CurrencyOption::IdReferrals],
            _ => &[],
        }
    }

    pub const fn implied_groups(self) -> &'static [GroupId] {
        match self {
            CurrencyOption::Token => &[GroupId::Token],
            CurrencyOption::Fractional => &[GroupId::Fractional],
            CurrencyOption::PBaaS => &[GroupId::PBaaS, GroupId::Gateway],
            CurrencyOption::Gateway => &[GroupId::Gateway],
            CurrencyOption::NftToken => &[GroupId::Nft],
            _ => &[],
        }
    }

    pub fn from_bit(bit: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.bit() == bit)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|option| option.name() == wanted)
    }
}

impl fmt::Display for CurrencyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Toggle state keyed by option bit value, as a form would hold it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    toggles: BTreeMap<u32, bool>,
}

impl OptionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: CurrencyOption) -> Self {
        self.set(option, true);
        self
    }

    pub fn set(&mut self, option: CurrencyOption, selected: bool) {
        self.toggles.insert(option.bit(), selected);
    }

    pub fn set_bit(&mut self, bit: u32, selected: bool) {
        self.toggles.insert(bit, selected);
    }

    pub fn is_selected(&self, option: CurrencyOption) -> bool {
        self.toggles.get(&option.bit()).copied().unwrap_or(false)
    }

    pub fn selected(&self) -> Vec<CurrencyOption> {
        CurrencyOption::ALL.iter().copied().filter(|option| self.is_selected(*option)).collect()
    }

    /// Bitwise OR of every selected toggle; bits outside the catalog are carried as-is.
    pub fn mask(&self) -> u32 {
        self.toggles.iter().filter(|(_, selected)| **selected).fold(0, |mask, (bit, _)| mask | bit)
    }

    /// Inverse of [`OptionSelection::mask`] over the catalog bits.
    pub fn from_mask(mask: u32) -> Self {
        let mut selection = Self::new();
        for option in CurrencyOption::ALL {
            if mask & option.bit() != 0 {
                selection.set(option, true);
            }
        }
        selection
    }
}

impl FromIterator<CurrencyOption> for OptionSelection {
    fn from_iter<I: IntoIterator<Item = CurrencyOption>>(iter: I) -> Self {
        let mut selection = Self::new();
        for option in iter {
            selection.set(option, true);
        }
        selection
    }
}

/// Flags derived from a selection. Recomputed on every change; never cached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProjectedOptions {
    pub mask: u32,
    /// Selected options whose prerequisites are also selected.
    pub effective: u32,
    pub is_token: bool,
    pub is_fractional: bool,
    pub is_nft: bool,
    pub is_pbaas: bool,
    pub is_gateway: bool,
    pub is_gateway_converter: bool,
    pub id_referrals: bool,
    pub show_notarization_reward: bool,
}

impl ProjectedOptions {
    pub fn is_effective(&self, option: CurrencyOption) -> bool {
        self.effective & option.bit() != 0
    }

    pub fn is_group_active(&self, group: GroupId) -> bool {
        CurrencyOption::ALL.iter().any(|option| self.is_effective(*option) && option.implied_groups().contains(&group))
    }

    pub fn active_groups(&self) -> Vec<GroupId> {
        [GroupId::Token, GroupId::Fractional, GroupId::PBaaS, GroupId::Gateway, GroupId::Nft]
            .into_iter()
            .filter(|group| self.is_group_active(*group))
            .collect()
    }

    /// A token that is neither fractional nor an NFT.
    pub fn is_plain_token(&self) -> bool {
        self.is_token && !self.is_fractional && !self.is_nft
    }
}

pub fn project(selection: &OptionSelection) -> ProjectedOptions {
    let effective = CurrencyOption::ALL
        .iter()
        .copied()
        .filter(|option| selection.is_selected(*option))
        .filter(|option| option.requires().iter().all(|required| selection.is_selected(*required)))
        .fold(0u32, |mask, option| mask | option.bit());
    let has = |option: CurrencyOption| effective & option.bit() != 0;
    ProjectedOptions {
        mask: selection.mask(),
        effective,
        is_token: has(CurrencyOption::Token),
        is_fractional: has(CurrencyOption::Fractional),
        is_nft: has(CurrencyOption::NftToken),
        is_pbaas: has(CurrencyOption::PBaaS),
        is_gateway: has(CurrencyOption::Gateway),
        is_gateway_converter: has(CurrencyOption::GatewayConverter),
        id_referrals: has(CurrencyOption::IdReferrals),
        show_notarization_reward: has(CurrencyOption::PBaaS) || has(CurrencyOption::GatewayConverter),
    }
}

pub fn project_mask(mask: u32) -> ProjectedOptions {
    let mut projected = project(&OptionSelection::from_mask(mask));
    projected.mask = mask;
    projected
}
