diesel::table! {
	client (id) {
		id -> BigInt,
		name -> Varchar,
		/// Contact phone, used as a lookup key by the public booking flow.
		phone -> Varchar,
		/// Canonical 11-digit CPF, validated before insertion.
		cpf -> Nullable<Varchar>,
		email -> Nullable<Varchar>,
		neighborhood -> Nullable<BigInt>,
		created_at -> Timestamp,
	}
}

diesel::table! {
	pet (id) {
		id -> BigInt,
		client -> BigInt,
		name -> Varchar,
		species -> Varchar,
		breed -> Nullable<BigInt>,
		notes -> Nullable<Varchar>,
	}
}

diesel::table! {
	breed (id) {
		id -> BigInt,
		name -> Varchar,
		species -> Varchar,
	}
}

diesel::table! {
	/// Table for offered grooming/veterinary services.
	grooming_service (id) {
		id -> BigInt,
		name -> Varchar,
		description -> Nullable<Varchar>,
		price_cents -> BigInt,
		duration_min -> Integer,
		/// Inactive services are kept for history but hidden from the
		/// public catalog and rejected by new bookings.
		active -> Bool,
	}
}

diesel::table! {
	category (id) {
		id -> BigInt,
		name -> Varchar,
	}
}

diesel::table! {
	supplier (id) {
		id -> BigInt,
		name -> Varchar,
		phone -> Nullable<Varchar>,
		email -> Nullable<Varchar>,
	}
}

diesel::table! {
	product (id) {
		id -> BigInt,
		name -> Varchar,
		category -> Nullable<BigInt>,
		supplier -> Nullable<BigInt>,
		price_cents -> BigInt,
		stock -> Integer,
		/// Stock level at or under which the product shows up in the
		/// low-stock report.
		min_stock -> Integer,
	}
}

diesel::table! {
	neighborhood (id) {
		id -> BigInt,
		name -> Varchar,
		pickup_fee_cents -> BigInt,
	}
}

diesel::table! {
	appointment (id) {
		id -> BigInt,
		client -> BigInt,
		scheduled_date -> Date,
		/// Time slot name, one of the slots configured for the service
		/// (e.g. `09:00`).
		time_slot -> Varchar,
		status -> Int2,
		status_msg -> Nullable<Varchar>,
		pickup -> Bool,
		neighborhood -> Nullable<BigInt>,
		/// Total price computed server-side at booking time.
		total_cents -> BigInt,
		created_at -> Timestamp,
	}
}

diesel::table! {
	/// Table for (appointment, pet, service) line items.
	appointment_item (id) {
		id -> BigInt,
		appointment -> BigInt,
		pet -> BigInt,
		service -> BigInt,
		/// Unit price captured at booking time, so later service price
		/// changes do not rewrite history.
		price_cents -> BigInt,
	}
}

diesel::table! {
	payment_method (id) {
		id -> BigInt,
		name -> Varchar,
	}
}

diesel::table! {
	payment (id) {
		id -> BigInt,
		appointment -> BigInt,
		method -> BigInt,
		amount_cents -> BigInt,
		paid_at -> Timestamp,
	}
}

diesel::table! {
	adoption_listing (id) {
		id -> BigInt,
		pet_name -> Varchar,
		species -> Varchar,
		breed -> Nullable<BigInt>,
		age_months -> Nullable<Integer>,
		description -> Nullable<Varchar>,
		/// Object storage key of the listing photo, if one was uploaded.
		photo_key -> Nullable<Varchar>,
		status -> Int2,
		created_at -> Timestamp,
	}
}

diesel::table! {
	adoption_story (id) {
		id -> BigInt,
		listing -> BigInt,
		title -> Varchar,
		body -> Varchar,
		published_at -> Timestamp,
	}
}

diesel::table! {
	users (id) {
		id -> BigInt,
		email -> Varchar,
		display_name -> Varchar,
		/// `hex(salt) ":" hex(sha256(salt || password))`.
		password_hash -> Varchar,
		is_admin -> Bool,
		created_at -> Timestamp,
	}
}

diesel::table! {
	sessions (token) {
		/// Opaque bearer token, 32 random bytes hex-encoded.
		token -> Varchar,
		user_id -> BigInt,
		created_at -> Timestamp,
		expires_at -> Timestamp,
	}
}

diesel::joinable!(pet -> client (client));
diesel::joinable!(pet -> breed (breed));
diesel::joinable!(product -> category (category));
diesel::joinable!(product -> supplier (supplier));
diesel::joinable!(appointment -> client (client));
diesel::joinable!(appointment_item -> appointment (appointment));
diesel::joinable!(appointment_item -> pet (pet));
diesel::joinable!(appointment_item -> grooming_service (service));
diesel::joinable!(payment -> appointment (appointment));
diesel::joinable!(payment -> payment_method (method));
diesel::joinable!(adoption_story -> adoption_listing (listing));
diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
	client,
	pet,
	breed,
	grooming_service,
	category,
	supplier,
	product,
	neighborhood,
	appointment,
	appointment_item,
	payment_method,
	payment,
	adoption_listing,
	adoption_story,
	users,
	sessions,
);
