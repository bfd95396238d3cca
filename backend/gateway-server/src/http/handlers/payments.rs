use gateway_api_types::payments::Transaction;

use super::macros::http_handler;

http_handler!(authorize, Transaction, Transaction, authorize, payments_service);
http_handler!(sale, Transaction, Transaction, sale, payments_service);
http_handler!(capture, Transaction, Transaction, capture, payments_service);
http_handler!(void, Transaction, Transaction, void, payments_service);
http_handler!(refund, Transaction, Transaction, refund, payments_service);
