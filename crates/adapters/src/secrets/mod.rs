pub mod http_secret_decryptor;
