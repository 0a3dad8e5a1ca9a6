use crate::error::LabelsError;
use crate::split_comment;
use fxhash::FxHashMap;
use reg_domain::money::Money;
use reg_domain::tld::TldPolicy;

/// A named premium list: `label,CUR amount` lines, one currency per list.
#[derive(Debug, Clone, Default)]
pub struct PremiumList {
    name: String,
    prices: FxHashMap<String, Money>,
}

impl PremiumList {
    /// # Errors
    /// [`LabelsError::Parse`] for malformed lines, duplicate labels or mixed currencies.
    pub fn parse(name: &str, text: &str) -> Result<Self, LabelsError> {
        let mut prices: FxHashMap<String, Money> = FxHashMap::default();
        let mut currency: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let (body, _) = split_comment(raw);
            if body.is_empty() {
                continue;
            }
            let (label, price) = body
                .split_once(',')
                .ok_or_else(|| LabelsError::parse(name, line, "expected 'label,CUR amount'"))?;
            let label = label.trim().to_ascii_lowercase();
            let price: Money = price
                .trim()
                .parse()
                .map_err(|e: reg_domain::money::ParseMoneyError| LabelsError::parse(name, line, e.to_string()))?;

            match &currency {
                Some(c) if c != price.currency() => {
                    return Err(LabelsError::parse(
                        name,
                        line,
                        format!("currency {} differs from {c}", price.currency()),
                    ));
                },
                Some(_) => {},
                None => currency = Some(price.currency().to_owned()),
            }
            if prices.insert(label.clone(), price).is_some() {
                return Err(LabelsError::parse(name, line, format!("duplicate label '{label}'")));
            }
        }

        Ok(Self { name: name.to_owned(), prices })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn price(&self, label: &str) -> Option<&Money> {
        self.prices.get(label)
    }
}

/// The cost of a create, and whether the label is premium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCost {
    pub amount: Money,
    pub premium: bool,
}

/// Resolves create prices from premium lists and zone defaults.
#[derive(Debug, Clone, Default)]
pub struct Pricing {
    lists: FxHashMap<String, PremiumList>,
}

impl Pricing {
    #[must_use]
    pub fn new(lists: impl IntoIterator<Item = PremiumList>) -> Self {
        Self { lists: lists.into_iter().map(|l| (l.name.clone(), l)).collect() }
    }

    /// Premium one-year price of `label` in `tld`, if it is on the zone's premium list.
    #[must_use]
    pub fn premium_price(&self, label: &str, tld: &TldPolicy) -> Option<&Money> {
        let list = self.lists.get(tld.premium_list.as_deref()?)?;
        list.price(label)
    }

    #[must_use]
    pub fn is_premium(&self, label: &str, tld: &TldPolicy) -> bool {
        self.premium_price(label, tld).is_some()
    }

    /// Create cost for `years`: premium price when listed, standard create cost otherwise.
    ///
    /// # Errors
    /// [`LabelsError::Pricing`] when the premium price is in another currency than the zone or
    /// the multiplication overflows.
    pub fn create_cost(
        &self,
        label: &str,
        tld: &TldPolicy,
        years: u32,
    ) -> Result<CreateCost, LabelsError> {
        let premium = self.premium_price(label, tld);
        let unit = premium.unwrap_or(&tld.create_cost);
        if unit.currency() != tld.currency() {
            return Err(LabelsError::Pricing {
                message: format!("premium price {unit} is not in {}", tld.currency()).into(),
                context: Some(tld.name.clone().into()),
            });
        }
        let amount = unit.times(years).ok_or_else(|| LabelsError::Pricing {
            message: format!("{unit} x {years} overflows").into(),
            context: Some(tld.name.clone().into()),
        })?;
        Ok(CreateCost { amount, premium: premium.is_some() })
    }
}
