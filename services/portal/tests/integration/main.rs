mod access_test;
mod records_test;
