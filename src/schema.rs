// Kept in sync by hand with DbContext::init_schema.

diesel::table! {
    feedback (id) {
        id -> Integer,
        user_message -> Text,
        advisor_response -> Text,
        rating -> Integer,
        comment -> Nullable<Text>,
        timestamp -> Text,
    }
}
