use crate::domain::content::{
    AboutData, ContactData, ContactFormData, ContactInfoData, ContactItem, ContentData,
    FormField, GalleryData, HeaderData, HeroData, MapData, ReviewsData, SectionData,
};
use crate::domain::variation::SectionCategory;

fn field(name: &str, label: &str, kind: &str, required: bool) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind: kind.to_string(),
        required,
    }
}

fn item(label: &str, value: &str, icon: &str) -> ContactItem {
    ContactItem {
        label: label.to_string(),
        value: value.to_string(),
        icon: Some(icon.to_string()),
    }
}

/// Payload given to a freshly added section. Text refers to business
/// fields through template tokens so a new section is filled in on render.
pub fn default_data(category: SectionCategory) -> SectionData {
    match category {
        SectionCategory::Hero => SectionData::Hero(HeroData {
            headline: "Welcome to {{businessName}}".to_string(),
            subheadline: "{{businessDescription}}".to_string(),
            cta_text: "Contact us".to_string(),
            cta_link: "#contact".to_string(),
            background_image: None,
        }),
        SectionCategory::About => SectionData::About(AboutData {
            heading: "About {{businessName}}".to_string(),
            body: "{{businessDescription}}".to_string(),
            image: None,
        }),
        SectionCategory::Gallery => SectionData::Gallery(GalleryData {
            heading: "Gallery".to_string(),
            images: Vec::new(),
        }),
        SectionCategory::Reviews => SectionData::Reviews(ReviewsData {
            heading: "What our customers say".to_string(),
            show_rating: true,
            reviews: Vec::new(),
        }),
        SectionCategory::Contact => SectionData::Contact(ContactData {
            heading: "Get in touch".to_string(),
            phone: "{{phone}}".to_string(),
            email: "{{email}}".to_string(),
            address: "{{address}}".to_string(),
            show_hours: true,
        }),
        SectionCategory::Map => SectionData::Map(MapData {
            heading: "Find us".to_string(),
            address: "{{address}}".to_string(),
            zoom: 15,
        }),
        SectionCategory::ContactForm => SectionData::ContactForm(ContactFormData {
            heading: "Send us a message".to_string(),
            submit_label: "Send".to_string(),
            recipient_email: "{{email}}".to_string(),
            fields: vec![
                field("name", "Name", "text", true),
                field("email", "Email", "email", true),
                field("message", "Message", "textarea", true),
            ],
        }),
        SectionCategory::Header => SectionData::Header(HeaderData {
            business_name: "{{businessName}}".to_string(),
            logo: None,
            links: Vec::new(),
        }),
        SectionCategory::Content => SectionData::Content(ContentData {
            heading: String::new(),
            markdown: "Tell your visitors more about {{businessName}}.".to_string(),
        }),
        SectionCategory::ContactInfo => SectionData::ContactInfo(ContactInfoData {
            heading: "Contact information".to_string(),
            items: vec![
                item("Phone", "{{phone}}", "phone"),
                item("Email", "{{email}}", "mail"),
                item("Address", "{{address}}", "map-pin"),
            ],
        }),
    }
}
