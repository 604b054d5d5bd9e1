use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};

pub const KEY_LEN: usize = 16;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// 分组密码解密原语
pub trait SegmentCipher: Send + Sync {
    fn decrypt(&self, data: Vec<u8>, key: &[u8; KEY_LEN], iv: &[u8; KEY_LEN]) -> Result<Vec<u8>, String>;
}

/// AES-128-CBC，去除 PKCS#7 填充，不加盐
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes128CbcCipher;

impl SegmentCipher for Aes128CbcCipher {
    fn decrypt(&self, mut data: Vec<u8>, key: &[u8; KEY_LEN], iv: &[u8; KEY_LEN]) -> Result<Vec<u8>, String> {
        Aes128CbcDec::new(key.into(), iv.into())
            .decrypt_padded_mut::<Pkcs7>(&mut data)
            .map(|x| x.to_vec())
            .map_err(|x| x.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::BlockEncryptMut;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    #[test]
    fn test_decrypt_reverses_encrypt() {
        let key = [7u8; KEY_LEN];
        let iv = [9u8; KEY_LEN];
        let plain = b"segment payload that spans more than one block".to_vec();
        let encrypted = Aes128CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(&plain);

        let decrypted = Aes128CbcCipher.decrypt(encrypted, &key, &iv).unwrap();
        assert_eq!(decrypted, plain);
    }

    #[test]
    fn test_decrypt_rejects_truncated_input() {
        let key = [1u8; KEY_LEN];
        let iv = [2u8; KEY_LEN];
        assert!(Aes128CbcCipher.decrypt(vec![0u8; 15], &key, &iv).is_err());
    }
}
