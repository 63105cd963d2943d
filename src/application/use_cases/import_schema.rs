// Centralized header alias configuration for CSV imports.
//
// Goal: keep header matching flexible without scattering alias lists.
// Aliases are matched as case-insensitive substrings of the resolved
// (lower-cased) header; real exports label columns inconsistently
// ("OwnerLastName" for a seller), so exact matching would reject most
// files.

use crate::domain::import::{EntityKind, FieldSpec, ImportSpec};

/// Canonical field keys. The key itself also participates in substring
/// matching, so it stays short and lower-case.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const TAGS: &str = "tags";
    pub const NOTES: &str = "notes";

    pub const ADDRESS: &str = "address";
    pub const SELLER: &str = "seller";
    pub const PRICE: &str = "price";
    pub const STATUS: &str = "status";
    pub const SETTLEMENT: &str = "settlement";

    pub const BUYER: &str = "buyer";
    pub const DOWN_PAYMENT: &str = "down";
    pub const EARNEST: &str = "earnest";
    pub const FINANCING: &str = "financing";
    pub const INSPECTION: &str = "inspection";
    pub const CONTINGENCIES: &str = "contingenc";
    pub const CLOSING: &str = "closing";

    pub const TITLE: &str = "title";
    pub const DUE_DATE: &str = "due";
    pub const PRIORITY: &str = "priority";
}

pub const NAME_ALIASES: &[&str] = &["full name", "client", "contact", "lead"];

pub const EMAIL_ALIASES: &[&str] = &["e-mail", "mail"];

pub const PHONE_ALIASES: &[&str] = &["mobile", "cell", "tel", "number"];

pub const TAGS_ALIASES: &[&str] = &["labels", "segments", "groups"];

pub const NOTES_ALIASES: &[&str] = &["comment", "remark", "description"];

pub const ADDRESS_ALIASES: &[&str] = &["property", "street", "location"];

pub const SELLER_ALIASES: &[&str] = &["owner", "vendor", "lister"];

pub const PRICE_ALIASES: &[&str] = &["amount", "amt", "value", "asking", "list price", "sale"];

pub const STATUS_ALIASES: &[&str] = &["stage", "state"];

// A recorded settlement date is authoritative evidence of a closed sale,
// so these headers are resolved separately from the textual status column.
pub const SETTLEMENT_ALIASES: &[&str] = &["settle", "closing", "close date", "sold date", "coe"];

pub const BUYER_ALIASES: &[&str] = &["purchaser", "offeror"];

pub const DOWN_PAYMENT_ALIASES: &[&str] = &["down payment", "downpayment", "deposit"];

pub const EARNEST_ALIASES: &[&str] = &["earnest money", "emd"];

pub const FINANCING_ALIASES: &[&str] = &["finance", "loan", "payment type"];

pub const INSPECTION_ALIASES: &[&str] = &["due diligence"];

pub const CONTINGENCIES_ALIASES: &[&str] = &["conditions"];

pub const CLOSING_ALIASES: &[&str] = &["close date", "coe"];

pub const TITLE_ALIASES: &[&str] = &["task", "todo", "subject", "summary"];

pub const DUE_DATE_ALIASES: &[&str] = &["deadline", "date"];

pub const PRIORITY_ALIASES: &[&str] = &["importance", "urgency"];

pub fn contact_spec() -> ImportSpec {
    ImportSpec {
        entity: EntityKind::Contacts,
        fields: vec![
            FieldSpec { key: fields::NAME, aliases: NAME_ALIASES },
            FieldSpec { key: fields::EMAIL, aliases: EMAIL_ALIASES },
            FieldSpec { key: fields::PHONE, aliases: PHONE_ALIASES },
            FieldSpec { key: fields::TAGS, aliases: TAGS_ALIASES },
            FieldSpec { key: fields::NOTES, aliases: NOTES_ALIASES },
        ],
    }
}

pub fn listing_spec() -> ImportSpec {
    ImportSpec {
        entity: EntityKind::Listings,
        fields: vec![
            FieldSpec { key: fields::ADDRESS, aliases: ADDRESS_ALIASES },
            FieldSpec { key: fields::SELLER, aliases: SELLER_ALIASES },
            FieldSpec { key: fields::PRICE, aliases: PRICE_ALIASES },
            FieldSpec { key: fields::STATUS, aliases: STATUS_ALIASES },
            FieldSpec { key: fields::SETTLEMENT, aliases: SETTLEMENT_ALIASES },
            FieldSpec { key: fields::NOTES, aliases: NOTES_ALIASES },
        ],
    }
}

pub fn offer_spec() -> ImportSpec {
    ImportSpec {
        entity: EntityKind::Offers,
        fields: vec![
            FieldSpec { key: fields::BUYER, aliases: BUYER_ALIASES },
            FieldSpec { key: fields::ADDRESS, aliases: ADDRESS_ALIASES },
            FieldSpec { key: fields::PRICE, aliases: PRICE_ALIASES },
            FieldSpec { key: fields::DOWN_PAYMENT, aliases: DOWN_PAYMENT_ALIASES },
            FieldSpec { key: fields::EARNEST, aliases: EARNEST_ALIASES },
            FieldSpec { key: fields::FINANCING, aliases: FINANCING_ALIASES },
            FieldSpec { key: fields::INSPECTION, aliases: INSPECTION_ALIASES },
            FieldSpec { key: fields::CONTINGENCIES, aliases: CONTINGENCIES_ALIASES },
            FieldSpec { key: fields::CLOSING, aliases: CLOSING_ALIASES },
            FieldSpec { key: fields::STATUS, aliases: STATUS_ALIASES },
        ],
    }
}

pub fn task_spec() -> ImportSpec {
    ImportSpec {
        entity: EntityKind::Tasks,
        fields: vec![
            FieldSpec { key: fields::TITLE, aliases: TITLE_ALIASES },
            FieldSpec { key: fields::DUE_DATE, aliases: DUE_DATE_ALIASES },
            FieldSpec { key: fields::PRIORITY, aliases: PRIORITY_ALIASES },
            FieldSpec { key: fields::STATUS, aliases: STATUS_ALIASES },
        ],
    }
}

pub fn spec_for(entity: EntityKind) -> ImportSpec {
    match entity {
        EntityKind::Contacts => contact_spec(),
        EntityKind::Listings => listing_spec(),
        EntityKind::Offers => offer_spec(),
        EntityKind::Tasks => task_spec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seller_resolves_owner_exports() {
        let spec = listing_spec();
        let seller = spec.fields.iter().find(|f| f.key == fields::SELLER).unwrap();
        assert!(seller.matches("ownerlastname"));
    }

    #[test]
    fn settlement_resolves_settle_date_headers() {
        let spec = listing_spec();
        let settlement = spec
            .fields
            .iter()
            .find(|f| f.key == fields::SETTLEMENT)
            .unwrap();
        assert!(settlement.matches("settledate"));
        assert!(settlement.matches("closing date"));
        assert!(!settlement.matches("status"));
    }
}
