use gateway_api_types::customers::{Customer, Source};

use super::macros::http_handler;

http_handler!(create_customer, Customer, Customer, create_customer, customers_service);
http_handler!(update_customer, Customer, Customer, update_customer, customers_service);
http_handler!(find_customer, Customer, Customer, find_customer, customers_service);
http_handler!(
    get_customer_sources,
    Customer,
    Vec<Source>,
    get_customer_sources,
    customers_service
);
http_handler!(
    create_customer_source,
    Source,
    Source,
    create_customer_source,
    customers_service
);
http_handler!(
    update_customer_source,
    Source,
    Source,
    update_customer_source,
    customers_service
);
http_handler!(
    find_customer_source,
    Source,
    Source,
    find_customer_source,
    customers_service
);
http_handler!(
    remove_customer_source,
    Source,
    Source,
    remove_customer_source,
    customers_service
);
