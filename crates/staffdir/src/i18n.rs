//! UI message tables (English/Turkish) with English fallback.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Languages the UI can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English.
    #[default]
    En,
    /// Turkish.
    Tr,
}

impl Lang {
    /// The other supported language.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Tr,
            Self::Tr => Self::En,
        }
    }

    /// Short language code as persisted.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tr" => Ok(Self::Tr),
            _ => Err(Error::parse("language", s)),
        }
    }
}

/// A message table keyed by short stable identifiers.
pub type MessageTable = HashMap<&'static str, &'static str>;

fn base_en() -> MessageTable {
    let pairs: [(&str, &str); 33] = [
        ("employees", "Employees"),
        ("employeeList", "Employee List"),
        ("addEmployee", "Add Employee"),
        ("editEmployee", "Edit Employee"),
        ("youAreEditing", "You are editing"),
        ("firstName", "First Name"),
        ("lastName", "Last Name"),
        ("employmentDate", "Date of Employment"),
        ("birthDate", "Date of Birth"),
        ("phone", "Phone"),
        ("email", "Email"),
        ("department", "Department"),
        ("position", "Position"),
        ("actions", "Actions"),
        ("search", "Search"),
        ("save", "Save"),
        ("cancel", "Cancel"),
        ("proceed", "Proceed"),
        ("areYouSure", "Are you sure?"),
        ("confirmdel1", "Selected employee record of"),
        ("confirmdel2", "will be deleted"),
        ("confirmEdit", "Do you want to edit"),
        ("confirmAdd", "Do you want to add"),
        ("employeeDeleted", "Employee deleted"),
        ("employeeAdded", "Employee added"),
        ("employeeUpdated", "Employee updated"),
        ("error", "Error: "),
        ("phoneExists", "This phone number is already registered"),
        ("emailExists", "This email address is already registered"),
        ("employeeNotFound", "Employee not found"),
        ("noResults", "No employees found"),
        ("loading", "Loading..."),
        ("page", "Page"),
    ];
    pairs.into_iter().collect()
}

fn tr_overlay() -> MessageTable {
    let pairs: [(&str, &str); 33] = [
        ("employees", "Çalışanlar"),
        ("employeeList", "Çalışan Listesi"),
        ("addEmployee", "Yeni Ekle"),
        ("editEmployee", "Çalışanı Düzenle"),
        ("youAreEditing", "Düzenlediğiniz kayıt"),
        ("firstName", "Ad"),
        ("lastName", "Soyad"),
        ("employmentDate", "İşe Başlama Tarihi"),
        ("birthDate", "Doğum Tarihi"),
        ("phone", "Telefon"),
        ("email", "E-posta"),
        ("department", "Departman"),
        ("position", "Pozisyon"),
        ("actions", "İşlemler"),
        ("search", "Ara"),
        ("save", "Kaydet"),
        ("cancel", "İptal"),
        ("proceed", "Devam"),
        ("areYouSure", "Emin misiniz?"),
        ("confirmdel1", "Seçilen çalışan kaydı"),
        ("confirmdel2", "silinecek"),
        ("confirmEdit", "Düzenlemek istiyor musunuz:"),
        ("confirmAdd", "Eklemek istiyor musunuz:"),
        ("employeeDeleted", "Çalışan silindi"),
        ("employeeAdded", "Çalışan eklendi"),
        ("employeeUpdated", "Çalışan güncellendi"),
        ("error", "Hata: "),
        ("phoneExists", "Bu telefon numarası zaten kayıtlı"),
        ("emailExists", "Bu e-posta adresi zaten kayıtlı"),
        ("employeeNotFound", "Çalışan bulunamadı"),
        ("noResults", "Çalışan bulunamadı"),
        ("loading", "Yükleniyor..."),
        ("page", "Sayfa"),
    ];
    pairs.into_iter().collect()
}

/// Message lookup for one language.
#[derive(Debug, Clone)]
pub struct Messages {
    lang: Lang,
    table: MessageTable,
}

impl Messages {
    /// Build the table for `lang`, overlaying its entries on English.
    #[must_use]
    pub fn for_lang(lang: Lang) -> Self {
        let mut table = base_en();
        if lang == Lang::Tr {
            table.extend(tr_overlay());
        }
        Self { lang, table }
    }

    /// The language this table was built for.
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Look up a message. Unknown keys come back verbatim.
    #[must_use]
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).copied().unwrap_or(key)
    }
}
