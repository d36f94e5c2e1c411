diesel::table! {
    owners (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        phone_number -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    contacts (id) {
        id -> Uuid,
        owner_id -> Uuid,
        contact_name -> Text,
        contact_email -> Text,
        contact_phone -> Text,
        contact_type -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(contacts -> owners (owner_id));

diesel::allow_tables_to_appear_in_same_query!(owners, contacts);
