pub mod bytes_ext;
pub mod types;

#[cfg(test)]
mod tests {
    use crate::types::MethodKey;

    #[test]
    fn it_formats_method_keys() {
        let key = MethodKey::new(
            "java/io/PrintStream",
            "println",
            "(Ljava/lang/String;)V",
        );

        assert_eq!(
            key.to_string(),
            "java/io/PrintStream.println(Ljava/lang/String;)V"
        );
    }
}
