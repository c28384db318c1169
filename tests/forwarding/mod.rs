mod test_search_client;
mod test_forwarder;
