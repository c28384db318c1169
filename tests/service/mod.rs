mod test_dispatch;
mod test_forwarding;
